//! Core data types
//!
//! # Why IndexMap?
//!
//! Headers, query parameters and environment variables use [`IndexMap`] so the
//! order a user typed them in is the order they are shown, exported and sent.
//! Equality between two maps still ignores order.
//!
//! [`IndexMap`]: indexmap::IndexMap

mod request;
mod response;
mod workspace;

pub use request::{ApiRequest, BodyType, HeaderMapDict, QueryParamsDict, RequestDescriptor};
pub use response::{ResponseRecord, NETWORK_ERROR_STATUS};
pub use workspace::{Collection, Environment};

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
