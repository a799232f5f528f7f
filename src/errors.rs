//! Every public error type, in one place.

pub use crate::client::starling::StarlingClientError;
pub use crate::client::ClientError;
pub use crate::model::TotalsError;
pub use crate::spending::SpendingError;
pub use starling_proto::starling::{LinkError, StarlingError};
