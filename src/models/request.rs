//! Request descriptor and the stored request entity

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;
use super::now_millis;

/// Header name to value. Keys are kept exactly as received.
pub type HeaderMapDict = IndexMap<String, String>;

/// Query parameter name to value
pub type QueryParamsDict = IndexMap<String, String>;

/// Structured description of an HTTP request.
///
/// Produced by the curl parser and consumed by the generator and the
/// executor. Treated as an immutable value: the `with_*` methods return a
/// modified copy instead of mutating in place.
///
/// `url` never carries a `?query` suffix; query parameters live in
/// `query_params`. Map equality ignores insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    #[serde(default)]
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: HeaderMapDict,
    #[serde(default)]
    pub query_params: QueryParamsDict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestDescriptor {
    /// GET request for `url` with no headers, params or body
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_method(&self, method: HttpMethod) -> Self {
        Self { method, ..self.clone() }
    }

    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self { url: url.into(), ..self.clone() }
    }

    pub fn with_header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.headers.insert(name.into(), value.into());
        next
    }

    pub fn with_query_param(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.query_params.insert(name.into(), value.into());
        next
    }

    pub fn with_body(&self, body: Option<String>) -> Self {
        Self { body, ..self.clone() }
    }

    /// Fill in default headers that the request does not already set.
    ///
    /// Header names are compared case-insensitively so a request's
    /// `content-type` suppresses a default `Content-Type`.
    pub fn with_default_headers(&self, defaults: &HeaderMapDict) -> Self {
        let mut next = self.clone();
        for (name, value) in defaults {
            let present = next.headers.keys().any(|k| k.eq_ignore_ascii_case(name));
            if !present {
                next.headers.insert(name.clone(), value.clone());
            }
        }
        next
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// How a stored request body is encoded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyType {
    #[default]
    None,
    RawJson,
    FormData,
    UrlEncoded,
}

impl BodyType {
    /// Guess an encoding for a body that came without one (e.g. from curl)
    pub fn infer(body: Option<&str>) -> Self {
        match body.map(str::trim) {
            None | Some("") => BodyType::None,
            Some(b) if b.starts_with('{') || b.starts_with('[') => BodyType::RawJson,
            Some(_) => BodyType::UrlEncoded,
        }
    }

    /// Content-Type sent for this encoding, if any
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyType::None => None,
            BodyType::RawJson => Some("application/json"),
            BodyType::FormData => Some("multipart/form-data"),
            BodyType::UrlEncoded => Some("application/x-www-form-urlencoded"),
        }
    }
}

/// A request saved in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub descriptor: RequestDescriptor,
    #[serde(default)]
    pub body_type: BodyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ApiRequest {
    /// Wrap a descriptor into a new stored request with a fresh id
    pub fn new(name: impl Into<String>, descriptor: RequestDescriptor) -> Self {
        let now = now_millis();
        let body_type = BodyType::infer(descriptor.body.as_deref());
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            descriptor,
            body_type,
            collection_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_collection(mut self, collection_id: Option<String>) -> Self {
        self.collection_id = collection_id;
        self
    }
}
