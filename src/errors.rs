//! Error types for reqpad

use thiserror::Error;

use crate::client::ExecutionError;
use crate::curl::ParseFailure;
use crate::middleware::auth::AuthError;

/// Main error type for reqpad
#[derive(Error, Debug)]
pub enum ReqpadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid curl command: {0}")]
    Curl(#[from] ParseFailure),

    #[error("Request failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{kind} not found: {id}")]
    NotFound {
        kind: &'static str,
        id: String,
    },

    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl ReqpadError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        ReqpadError::NotFound { kind, id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, ReqpadError>;
