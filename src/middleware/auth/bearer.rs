//! Bearer Token Authentication (RFC 6750)

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Bearer token authentication
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerAuth {
    pub token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Apply Bearer auth header to request
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), AuthError> {
        let header_value = format!("Bearer {}", self.token);

        let value = HeaderValue::from_str(&header_value)
            .map_err(|e| AuthError::InvalidHeader(e.to_string()))?;

        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl std::fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerAuth([REDACTED])")
    }
}
