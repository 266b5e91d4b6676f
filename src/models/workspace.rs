//! Collections and environments

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::now_millis;

/// Named group of saved requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Collection {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Named set of `{{variable}}` values. At most one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Environment {
    /// New inactive environment
    pub fn new(name: impl Into<String>, variables: IndexMap<String, String>) -> Self {
        let now = now_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            variables,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }
}
