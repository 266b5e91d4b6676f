//! Request authentication
//!
//! Authentication is a sum type over the supported schemes rather than a
//! trait object: the set is finite and each variant is plain data that can be
//! serialized alongside a request.

mod apikey;
mod basic;
mod bearer;

pub use apikey::{ApiKeyAuth, ApiKeyLocation};
pub use basic::BasicAuth;
pub use bearer::BearerAuth;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

/// How a request authenticates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    #[default]
    None,
    /// HTTP Basic Authentication (RFC 7617)
    Basic(BasicAuth),
    /// Bearer token authentication (RFC 6750)
    Bearer(BearerAuth),
    /// API key sent as a header or query parameter
    ApiKey(ApiKeyAuth),
}

impl AuthConfig {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::Basic(BasicAuth::new(username, password))
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        AuthConfig::Bearer(BearerAuth::new(token))
    }

    pub fn api_key(key: impl Into<String>, value: impl Into<String>, location: ApiKeyLocation) -> Self {
        AuthConfig::ApiKey(ApiKeyAuth::new(key, value, location))
    }

    /// Apply authentication to request headers
    pub fn apply_headers(&self, headers: &mut HeaderMap) -> Result<(), AuthError> {
        match self {
            AuthConfig::None => Ok(()),
            AuthConfig::Basic(auth) => auth.apply(headers),
            AuthConfig::Bearer(auth) => auth.apply(headers),
            AuthConfig::ApiKey(auth) => auth.apply(headers),
        }
    }

    /// Query parameter to append, for API keys sent in the URL
    pub fn query_param(&self) -> Option<(&str, &str)> {
        match self {
            AuthConfig::ApiKey(auth) => auth.query_param(),
            _ => None,
        }
    }

    /// Authentication type name for display/debugging
    pub fn type_name(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::Basic(_) => "basic",
            AuthConfig::Bearer(_) => "bearer",
            AuthConfig::ApiKey(_) => "api-key",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_basic_auth() {
        let auth = AuthConfig::basic("user", "pass");
        let mut headers = HeaderMap::new();
        auth.apply_headers(&mut headers).unwrap();

        let value = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(value.starts_with("Basic "));

        let encoded = &value[6..];
        let decoded = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            encoded
        ).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "user:pass");
    }

    #[test]
    fn test_bearer_auth() {
        let auth = AuthConfig::bearer("my-token");
        let mut headers = HeaderMap::new();
        auth.apply_headers(&mut headers).unwrap();

        let value = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert_eq!(value, "Bearer my-token");
    }

    #[test]
    fn test_auth_overrides_existing_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer stale".parse().unwrap());
        AuthConfig::bearer("fresh").apply_headers(&mut headers).unwrap();
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers[AUTHORIZATION], "Bearer fresh");
    }

    #[test]
    fn test_api_key_header() {
        let auth = AuthConfig::api_key("X-API-Key", "secret123", ApiKeyLocation::Header);
        let mut headers = HeaderMap::new();
        auth.apply_headers(&mut headers).unwrap();

        assert_eq!(headers.get("X-API-Key").unwrap().to_str().unwrap(), "secret123");
        assert!(auth.query_param().is_none());
    }

    #[test]
    fn test_api_key_query_param() {
        let auth = AuthConfig::api_key("api_key", "secret123", ApiKeyLocation::QueryParam);
        let mut headers = HeaderMap::new();
        auth.apply_headers(&mut headers).unwrap();

        assert!(headers.is_empty());
        assert_eq!(auth.query_param(), Some(("api_key", "secret123")));
    }

    #[test]
    fn test_none_is_noop() {
        let mut headers = HeaderMap::new();
        AuthConfig::None.apply_headers(&mut headers).unwrap();
        assert!(headers.is_empty());
        assert_eq!(AuthConfig::default(), AuthConfig::None);
    }

    #[test]
    fn test_invalid_header_name() {
        let auth = AuthConfig::api_key("bad header", "v", ApiKeyLocation::Header);
        let mut headers = HeaderMap::new();
        assert!(matches!(auth.apply_headers(&mut headers), Err(AuthError::InvalidHeader(_))));
    }

    #[test]
    fn test_serde_tagged() {
        let auth = AuthConfig::api_key("k", "v", ApiKeyLocation::QueryParam);
        let json = serde_json::to_value(&auth).unwrap();
        assert_eq!(json["type"], "api_key");
        assert_eq!(json["location"], "QUERY_PARAM");
        let back: AuthConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, auth);
    }
}
