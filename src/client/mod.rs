//! HTTP request execution

pub mod http;

use std::time::Duration;

use thiserror::Error;

pub use http::HttpClient;

pub const USER_AGENT_STRING: &str = concat!("reqpad/", env!("CARGO_PKG_VERSION"));

/// A request that never produced an HTTP response
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<reqwest::Error> for ExecutionError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        ExecutionError::new(message)
    }
}

/// Settings for building an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub verify_ssl: bool,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            verify_ssl: true,
            user_agent: USER_AGENT_STRING.to_string(),
        }
    }
}
