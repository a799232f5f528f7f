//! Transaction summaries and details.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response envelope of the "list transactions" endpoint.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct TransactionList {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
}

/// Embedded resources of a [`TransactionList`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Embedded {
    #[serde(default)]
    pub transactions: Vec<TransactionSummary>,
}

impl TransactionList {
    /// Unwrap the envelope.
    pub fn into_transactions(self) -> Vec<TransactionSummary> {
        self.embedded.transactions
    }
}

/// A lightweight transaction record with a link to its [`TransactionDetail`].
///
/// Only the detail link is required. Every other field falls back to its default when absent.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Transaction ID.
    #[serde(default)]
    pub id: String,

    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: String,

    /// Signed transaction amount. Outbound transactions are negative.
    #[serde(default)]
    pub amount: Decimal,

    #[serde(default)]
    pub direction: Direction,

    /// Free-text description, usually the counterparty name.
    #[serde(default)]
    pub narrative: String,

    /// Source channel, e.g. `MASTER_CARD` or `FASTER_PAYMENTS_OUT`.
    #[serde(default)]
    pub source: String,

    /// Account balance after this transaction.
    #[serde(default)]
    pub balance: Decimal,

    /// Without a detail link the transaction cannot be categorized.
    #[serde(rename = "_links")]
    pub links: Links,
}

/// HAL links of a [`TransactionSummary`].
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct Links {
    pub detail: DetailLink,
}

/// Reference to a [`TransactionDetail`] resource.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct DetailLink {
    pub href: String,

    /// The `href` is a URI template (RFC 6570).
    #[serde(default)]
    pub templated: bool,
}

/// The full transaction record, including its spending category.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub amount: Decimal,

    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub direction: Direction,

    #[serde(default)]
    pub narrative: String,

    #[serde(default)]
    pub source: String,

    /// Spending category label. `None` when the field is absent or `null`.
    #[serde(default)]
    pub spending_category: Option<String>,
}

/// Money flow direction relative to the account.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Inbound,
    Outbound,

    /// Any direction label this crate does not know about.
    #[default]
    #[serde(other)]
    Other,
}
