//! A [Starling Bank API] client, [sans I/O]. (Bring your own sync/async HTTP client!)
//!
//! This library handles the protocol-layer aspects of the Starling transactions API, including
//! ser-de and request construction. Every request carries the bearer credential it was built
//! with.
//!
//! [Starling Bank API]: https://developer.starlingbank.com/docs
//! [sans I/O]: https://sans-io.readthedocs.io/how-to-sans-io.html
//!
//! # Sync example with `ureq`
//!
//! ```no_run
//! use starling_proto::starling::{Starling, Token, TransactionDetail, TransactionList};
//!
//! fn main() -> anyhow::Result<()> {
//!     let agent = ureq::agent();
//!     let token = Token::new("personal-access-token");
//!     let starling = Starling::new("https://api.starlingbank.com/", &token)?;
//!
//!     let mut resp = agent.run(starling.list_transactions())?;
//!     let list: TransactionList = resp.body_mut().read_json()?;
//!
//!     for summary in list.into_transactions() {
//!         let req = starling.get_transaction_detail(&summary.links.detail)?;
//!         let mut resp = agent.run(req)?;
//!         let detail: TransactionDetail = resp.body_mut().read_json()?;
//!
//!         println!("{detail:#?}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub use http;
pub use rust_decimal;

pub mod starling;

pub type Req = http::Request<()>;

/// Append a relative path (and optional query) to the request.
///
/// The path is always joined below the request's existing path, as if that path ended with `/`.
pub(crate) fn append_path(req: &mut Req, path: &str) -> Result<(), http::Error> {
    // The `http` crate has really bad ergonomics for updating paths.
    // SEE: https://github.com/hyperium/http/issues/594
    let req_uri = req.uri_mut();
    let mut uri_parts = req_uri.clone().into_parts();
    let root = req_uri.path().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    uri_parts.path_and_query = Some(format!("{root}/{path}").parse()?);
    *req_uri = http::Uri::from_parts(uri_parts)?;

    Ok(())
}
