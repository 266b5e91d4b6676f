//! HTTP request building and sending
//!
//! Turns a [`RequestDescriptor`] into a reqwest request, sends it and
//! records the outcome as a [`ResponseRecord`].

use std::time::Instant;

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use url::Url;

use super::{ClientOptions, ExecutionError};
use crate::middleware::auth::AuthConfig;
use crate::models::{now_millis, BodyType, RequestDescriptor, ResponseRecord};

/// Sends requests described by [`RequestDescriptor`]s
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(options: &ClientOptions) -> Result<Self, ExecutionError> {
        let mut builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout);

        if !options.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ExecutionError::new(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Execute a request, inferring the body encoding from its content
    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        auth: &AuthConfig,
    ) -> Result<ResponseRecord, ExecutionError> {
        let body_type = BodyType::infer(request.body.as_deref());
        self.execute_with(request, body_type, auth).await
    }

    /// Execute a request with an explicit body encoding
    pub async fn execute_with(
        &self,
        request: &RequestDescriptor,
        body_type: BodyType,
        auth: &AuthConfig,
    ) -> Result<ResponseRecord, ExecutionError> {
        let url = build_url(request, auth)?;
        let mut headers = build_headers(request)?;
        auth.apply_headers(&mut headers)
            .map_err(|e| ExecutionError::new(e.to_string()))?;

        let mut builder = self
            .client
            .request(request.method.into(), url.clone());

        if let Some(body) = request_body(request, body_type) {
            if !headers.contains_key(CONTENT_TYPE) {
                if let Some(content_type) = body_type.content_type() {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
            }
            builder = builder.body(body.to_string());
        }

        tracing::debug!(method = %request.method, url = %url, "sending request");

        let start = Instant::now();
        let response = builder.headers(headers).send().await?;
        let record = read_response(response, start).await?;

        tracing::debug!(
            status = record.status_code,
            elapsed_ms = record.response_time,
            size = record.response_size,
            "received response"
        );
        Ok(record)
    }
}

/// Base URL plus query parameters and any query-located API key
fn build_url(request: &RequestDescriptor, auth: &AuthConfig) -> Result<Url, ExecutionError> {
    let mut url = Url::parse(&request.url)
        .map_err(|e| ExecutionError::new(format!("invalid URL '{}': {}", request.url, e)))?;

    let api_key = auth.query_param();
    if !request.query_params.is_empty() || api_key.is_some() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &request.query_params {
            pairs.append_pair(name, value);
        }
        if let Some((name, value)) = api_key {
            pairs.append_pair(name, value);
        }
    }

    Ok(url)
}

fn build_headers(request: &RequestDescriptor) -> Result<HeaderMap, ExecutionError> {
    let mut headers = HeaderMap::with_capacity(request.headers.len());
    for (name, value) in &request.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ExecutionError::new(format!("invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ExecutionError::new(format!("invalid value for header '{}': {}", name, e)))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Body to send, if the method carries one and the encoding allows it
fn request_body(request: &RequestDescriptor, body_type: BodyType) -> Option<&str> {
    if !request.method.allows_body() || body_type == BodyType::None {
        return None;
    }
    request.body.as_deref().filter(|b| !b.trim().is_empty())
}

async fn read_response(response: Response, start: Instant) -> Result<ResponseRecord, ExecutionError> {
    let status = response.status();

    let mut headers: IndexMap<String, String> = IndexMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let bytes = response.bytes().await?;
    let elapsed = start.elapsed().as_millis() as u64;
    let body = if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&bytes).into_owned())
    };

    Ok(ResponseRecord {
        id: uuid::Uuid::new_v4().to_string(),
        request_id: None,
        status_code: status.as_u16(),
        status_message: status.canonical_reason().unwrap_or("").to_string(),
        headers,
        body,
        response_time: elapsed,
        response_size: bytes.len() as u64,
        timestamp: now_millis(),
        is_error: false,
        error_message: None,
    })
}
