//! reqpad library interface
//!
//! Converts between curl command lines and structured HTTP requests, sends
//! requests, and keeps a local store of requests, responses, collections and
//! environments.
//!
//! # Module Organization
//!
//! - [`curl`] - curl tokenizer, parser and generator
//! - [`models`] - Request descriptors and stored entities
//! - [`vars`] - `{{variable}}` substitution and `.env` parsing
//! - [`client`] - HTTP execution
//! - [`store`] - Persistent, observable store
//! - [`service`] - Send pipeline
//! - [`errors`] - Error types (ReqpadError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Command line entry point

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod curl;
pub mod errors;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod output;
pub mod service;
pub mod status;
pub mod store;
pub mod vars;

pub use errors::{ReqpadError, Result};
