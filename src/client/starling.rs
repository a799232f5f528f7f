use super::{ClientApi, ClientError};
use starling_proto::http::StatusCode;
use starling_proto::starling::{
    DetailLink, Starling, StarlingError, Token, TransactionDetail, TransactionList,
    TransactionSummary,
};
use starling_proto::Req;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use ureq::tls::{TlsConfig, TlsProvider};
use ureq::Agent;

/// Production API server.
pub const DEFAULT_API_URL: &str = "https://api.starlingbank.com/";

#[derive(Debug, Error)]
pub enum StarlingClientError {
    #[error("Invalid Starling API URI `{0}`")]
    ApiUri(String, #[source] StarlingError),

    #[error("Invalid Starling access token")]
    Token(#[source] StarlingError),
}

/// A simple, sequential Starling client.
///
/// Every request blocks until the full response body has been read.
pub struct StarlingClient {
    agent: Agent,
    starling: Starling,
}

/// A response with its body read to completion.
struct Fetched {
    url: String,
    status: StatusCode,
    body: String,
}

impl StarlingClient {
    /// Create a new Starling client with the provided API server URI and credential.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> Result<(), spendcount::client::starling::StarlingClientError> {
    /// use spendcount::client::starling::{StarlingClient, DEFAULT_API_URL};
    /// use spendcount::starling_proto::starling::Token;
    ///
    /// let client = StarlingClient::new(DEFAULT_API_URL, Token::new("personal-access-token"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_server: &str, token: Token) -> Result<Self, StarlingClientError> {
        // Statuses are inspected by the caller: a rejected detail request is not an error.
        let agent = Agent::from(
            Agent::config_builder()
                .http_status_as_error(false)
                .tls_config(
                    TlsConfig::builder()
                        .provider(TlsProvider::NativeTls)
                        .build(),
                )
                .build(),
        );
        let starling = Starling::new(api_server, &token).map_err(|err| match err {
            StarlingError::Token(_) => StarlingClientError::Token(err),
            _ => StarlingClientError::ApiUri(api_server.to_string(), err),
        })?;

        Ok(Self { agent, starling })
    }

    fn fetch(&self, req: Req) -> Result<Fetched, ClientError> {
        let url = req.uri().to_string();

        info!("Fetching `{url}`");

        let start = Instant::now();
        let mut resp = self
            .agent
            .run(req)
            .map_err(|err| ClientError::Transport(url.clone(), err))?;
        let status = resp.status();
        let body = resp
            .body_mut()
            .read_to_string()
            .map_err(|err| ClientError::Body(url.clone(), err))?;
        let dur = start.elapsed();

        info!("`{url}` responded {status} in {dur:?}");
        trace!("{body}");

        Ok(Fetched { url, status, body })
    }
}

impl ClientApi for StarlingClient {
    fn get_transactions(&self) -> Result<Vec<TransactionSummary>, ClientError> {
        let Fetched { url, status, body } = self.fetch(self.starling.list_transactions())?;
        if !status.is_success() {
            return Err(ClientError::Status(url, status));
        }

        let list: TransactionList =
            serde_json::from_str(&body).map_err(|err| ClientError::Decode(url, err))?;
        let transactions = list.into_transactions();

        debug!("Received {} transactions", transactions.len());
        trace!("{transactions:#?}");

        Ok(transactions)
    }

    fn get_transaction_detail(
        &self,
        link: &DetailLink,
    ) -> Result<Option<TransactionDetail>, ClientError> {
        let req = match self.starling.get_transaction_detail(link) {
            Ok(req) => req,
            Err(err) => {
                warn!("Unable to request transaction details: {err}");
                return Ok(None);
            }
        };

        let Fetched { url, status, body } = self.fetch(req)?;
        if status != StatusCode::OK {
            debug!("Failed to fetch transaction details for `{url}`: {status}");
            return Ok(None);
        }

        let detail: TransactionDetail =
            serde_json::from_str(&body).map_err(|err| ClientError::Decode(url, err))?;

        trace!("{detail:#?}");

        Ok(Some(detail))
    }
}
