//! Recorded HTTP responses

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::now_millis;

/// Status text recorded for transport failures
pub const NETWORK_ERROR_STATUS: &str = "Network Error";

/// Outcome of executing a request, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: String,
    /// Stored request this response belongs to, if it was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub status_code: u16,
    pub status_message: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Elapsed wall-clock time in milliseconds
    pub response_time: u64,
    /// Body size in bytes
    pub response_size: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ResponseRecord {
    /// Record for a transport failure (status code 0)
    pub fn from_error(request_id: Option<String>, message: impl Into<String>, response_time: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            request_id,
            status_code: 0,
            status_message: NETWORK_ERROR_STATUS.to_string(),
            headers: IndexMap::new(),
            body: None,
            response_time,
            response_size: 0,
            timestamp: now_millis(),
            is_error: true,
            error_message: Some(message.into()),
        }
    }

    pub fn for_request(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn is_success(&self) -> bool {
        !self.is_error && (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error() {
        let record = ResponseRecord::from_error(Some("r1".to_string()), "connection refused", 12);
        assert!(record.is_error);
        assert_eq!(record.status_code, 0);
        assert_eq!(record.status_message, NETWORK_ERROR_STATUS);
        assert_eq!(record.error_message.as_deref(), Some("connection refused"));
        assert_eq!(record.request_id.as_deref(), Some("r1"));
        assert!(!record.is_success());
    }
}
