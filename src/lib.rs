#![forbid(unsafe_code)]

pub use starling_proto;

pub mod client;
pub mod errors;
pub mod model;
pub mod spending;
