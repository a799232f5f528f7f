//! The fetch-then-aggregate pipeline.

use crate::client::{ClientApi, ClientError};
use crate::model::{CategoryTotals, Stats, TotalsError};
use starling_proto::starling::{TransactionDetail, TransactionSummary};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SpendingError {
    #[error("Unable to fetch transactions")]
    Client(#[from] ClientError),

    #[error("Unable to total spending")]
    Totals(#[from] TotalsError),
}

/// Result of a completed run.
#[derive(Debug)]
pub struct Spending {
    /// Every successfully fetched detail record, in transaction list order.
    pub details: Vec<TransactionDetail>,

    pub totals: CategoryTotals,
}

/// Fetch the details for each summary, one at a time and in order.
///
/// Transactions whose details are unavailable are skipped. Any [`ClientError`] aborts the batch.
pub fn collect_details<C>(
    client: &C,
    summaries: &[TransactionSummary],
    stats: &mut Stats,
) -> Result<Vec<TransactionDetail>, ClientError>
where
    C: ClientApi + ?Sized,
{
    let mut details = Vec::with_capacity(summaries.len());

    for summary in summaries {
        match client.get_transaction_detail(&summary.links.detail)? {
            Some(detail) => {
                stats.inc_details();
                details.push(detail);
            }
            None => {
                debug!("Skipping transaction `{}`", summary.id);
                stats.inc_skipped();
            }
        }
    }

    Ok(details)
}

/// Fetch the transaction list and every transaction's details, then total them by category.
///
/// When the list cannot be fetched, no details are requested.
pub fn tally<C>(client: &C, stats: &mut Stats) -> Result<Spending, SpendingError>
where
    C: ClientApi + ?Sized,
{
    let summaries = client.get_transactions()?;
    stats.add_transactions(summaries.len());

    let details = collect_details(client, &summaries, stats)?;
    check_currencies(&details);

    info!("Collating {} transactions", details.len());
    let totals = CategoryTotals::collate(&details)?;

    Ok(Spending { details, totals })
}

/// Amounts are summed as-is. Mixed currencies are reported but not converted.
fn check_currencies(details: &[TransactionDetail]) {
    let currencies = details
        .iter()
        .map(|detail| detail.currency.as_str())
        .filter(|currency| !currency.is_empty())
        .collect::<BTreeSet<_>>();

    if currencies.len() > 1 {
        warn!("Totals mix amounts in multiple currencies: {currencies:?}");
    }
}
