//! An implementation of the Starling transactions API. The main type is the [`Starling`] client.

pub use self::token::Token;
pub use self::transaction::{
    DetailLink, Direction, Embedded, Links, TransactionDetail, TransactionList, TransactionSummary,
};
use crate::{append_path, Req};
use http::header::{InvalidHeaderValue, ACCEPT, AUTHORIZATION};
use http::{Request, Uri};
use thiserror::Error;

mod token;
mod transaction;

/// Path of the "list transactions" endpoint, relative to the API root.
pub const TRANSACTIONS_PATH: &str = "api/v1/transactions";

/// Errors creating a [`Starling`] client.
#[derive(Debug, Error)]
pub enum StarlingError {
    #[error("Invalid API URI")]
    Uri(#[from] http::Error),

    /// Relative URIs like `/hello/world` and authority-only URIs like `localhost:3000` cannot be
    /// requested.
    #[error("API URI `{0}` must have both a scheme and a host")]
    NotNetworkUri(String),

    #[error("Bearer token is not a valid HTTP header value")]
    Token(#[source] InvalidHeaderValue),
}

/// Errors resolving a [`DetailLink`] into a request.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The link is a URI template with unexpanded variables.
    #[error("Detail link `{0}` is templated")]
    Templated(String),

    /// The link points outside of the API server. The credential is never sent there.
    #[error("Detail link `{0}` points to a foreign host")]
    ForeignHost(String),

    /// The link is not a valid URI.
    #[error("Detail link `{0}` is not a valid URI")]
    Uri(String, #[source] http::Error),
}

/// The main Starling client.
#[derive(Clone, Debug)]
pub struct Starling {
    req: Req,
}

impl Starling {
    /// Starling client constructor.
    ///
    /// The API endpoint string must be a valid [`Uri`]. All requests created by this client are
    /// authenticated with the bearer `token`.
    ///
    /// # Example
    ///
    /// ```
    /// # use starling_proto::starling::{Starling, Token};
    /// # fn main() -> anyhow::Result<()> {
    /// let token = Token::new("personal-access-token");
    /// let starling = Starling::new("https://api.starlingbank.com/", &token)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// The API server URI must have both a scheme and host component, and the token must be
    /// usable as an HTTP header value.
    pub fn new<U>(api: U, token: &Token) -> Result<Self, StarlingError>
    where
        U: TryInto<Uri>,
        <U as TryInto<Uri>>::Error: Into<http::Error>,
    {
        let authorization = token.to_header_value().map_err(StarlingError::Token)?;
        let req = Request::get(api)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .body(())?;

        let uri = req.uri();
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(StarlingError::NotNetworkUri(uri.to_string()));
        }

        Ok(Self { req })
    }

    /// List the account's transactions.
    ///
    /// Returns a [`Req`] which can be sent by your preferred HTTP client.
    ///
    /// The response can be deserialized from JSON into a [`TransactionList`].
    pub fn list_transactions(&self) -> Req {
        let mut req = self.req.clone();
        // `TRANSACTIONS_PATH` is a valid path.
        append_path(&mut req, TRANSACTIONS_PATH).unwrap();

        req
    }

    /// Get a single transaction's details by following its [`DetailLink`].
    ///
    /// Relative links are resolved below the API root. Absolute links are only followed when they
    /// share the scheme and authority of the API root.
    ///
    /// The response can be deserialized from JSON into a [`TransactionDetail`].
    pub fn get_transaction_detail(&self, link: &DetailLink) -> Result<Req, LinkError> {
        let href = link.href.as_str();
        if link.templated && href.contains('{') {
            return Err(LinkError::Templated(href.to_string()));
        }

        let mut req = self.req.clone();
        if is_absolute(href) {
            let uri: Uri = href
                .parse()
                .map_err(|err: http::uri::InvalidUri| LinkError::Uri(href.to_string(), err.into()))?;
            let root = self.req.uri();
            if uri.scheme() != root.scheme() || uri.authority() != root.authority() {
                return Err(LinkError::ForeignHost(href.to_string()));
            }
            *req.uri_mut() = uri;
        } else {
            append_path(&mut req, href).map_err(|err| LinkError::Uri(href.to_string(), err))?;
        }

        Ok(req)
    }
}

fn is_absolute(href: &str) -> bool {
    href.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
    })
}
