//! HTTP protocol types
//!
//! Provides the method enumeration shared by the curl transcoder, the store
//! and the request executor.

mod method;

pub use method::*;
