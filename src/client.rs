use starling_proto::http::StatusCode;
use starling_proto::starling::{DetailLink, TransactionDetail, TransactionSummary};
use thiserror::Error;

pub mod starling;

/// The public interface for the client API.
///
/// Exists as a trait so that unit tests can mock the client responses.
pub trait ClientApi {
    /// Get the account's transaction summaries.
    ///
    /// Any failure is an error: there is nothing to do without the list.
    fn get_transactions(&self) -> Result<Vec<TransactionSummary>, ClientError>;

    /// Get a single transaction's details.
    ///
    /// Returns `Ok(None)` when the server rejects the request or the link cannot be requested.
    /// Transport and decoding failures are errors.
    fn get_transaction_detail(
        &self,
        link: &DetailLink,
    ) -> Result<Option<TransactionDetail>, ClientError>;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unable to reach `{0}`")]
    Transport(String, #[source] ureq::Error),

    #[error("Unable to read response body from `{0}`")]
    Body(String, #[source] ureq::Error),

    #[error("Request to `{0}` failed with status {1}")]
    Status(String, StatusCode),

    #[error("Unable to decode JSON from `{0}`")]
    Decode(String, #[source] serde_json::Error),
}
