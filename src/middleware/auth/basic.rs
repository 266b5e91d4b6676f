//! HTTP Basic Authentication (RFC 7617)

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// HTTP Basic Authentication credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Split `user:password` on the first colon; a missing password is empty
    pub fn from_credentials(credentials: &str) -> Self {
        match credentials.split_once(':') {
            Some((user, pass)) => Self::new(user, pass),
            None => Self::new(credentials, ""),
        }
    }

    /// Apply Basic auth header to request
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), AuthError> {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        let header_value = format!("Basic {}", encoded);

        let value = HeaderValue::from_str(&header_value)
            .map_err(|e| AuthError::InvalidHeader(e.to_string()))?;

        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
