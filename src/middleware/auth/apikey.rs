//! API Key Authentication via custom header or query parameter

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Where the API key travels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    QueryParam,
}

/// API Key authentication
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyAuth {
    /// Header or query parameter name
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub location: ApiKeyLocation,
}

impl ApiKeyAuth {
    pub fn new(key: impl Into<String>, value: impl Into<String>, location: ApiKeyLocation) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            location,
        }
    }

    /// Apply API Key header to request (no-op for query parameter keys)
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), AuthError> {
        if self.location != ApiKeyLocation::Header {
            return Ok(());
        }

        let name = HeaderName::from_bytes(self.key.as_bytes())
            .map_err(|e| AuthError::InvalidHeader(format!("invalid header name: {}", e)))?;

        let value = HeaderValue::from_str(&self.value)
            .map_err(|e| AuthError::InvalidHeader(e.to_string()))?;

        headers.insert(name, value);
        Ok(())
    }

    pub fn query_param(&self) -> Option<(&str, &str)> {
        match self.location {
            ApiKeyLocation::QueryParam => Some((&self.key, &self.value)),
            ApiKeyLocation::Header => None,
        }
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .field("location", &self.location)
            .finish()
    }
}
