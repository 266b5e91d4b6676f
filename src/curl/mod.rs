//! curl command line transcoding
//!
//! Converts between a pasted curl command and a [`RequestDescriptor`]:
//!
//! - [`tokenize`] splits the command line into shell-style arguments
//! - [`parse`] recognizes method, header and data flags plus the URL
//! - [`generate`] writes a descriptor back out as a curl command
//!
//! ```
//! use reqpad::curl::{generate, parse};
//!
//! let req = parse(r#"curl -H "Accept: application/json" "https://api.example.com/users?page=2""#).unwrap();
//! assert_eq!(req.url, "https://api.example.com/users");
//! assert_eq!(req.query_params["page"], "2");
//!
//! assert_eq!(
//!     generate(&req),
//!     r#"curl -H "Accept: application/json" "https://api.example.com/users?page=2""#
//! );
//! ```
//!
//! Round trips are lossy in one way only: an explicit `-X GET` is never
//! written back, because GET is the default.
//!
//! [`RequestDescriptor`]: crate::models::RequestDescriptor

mod generate;
mod parse;
mod tokenize;

pub use generate::{format_curl_pretty, full_url, generate};
pub use parse::{parse, ParseFailure};
pub use tokenize::tokenize;

/// Command name every parsed line must start with
pub const COMMAND: &str = "curl";
