//! Send pipeline tying the store, the HTTP client and configuration together

use std::sync::Arc;
use std::time::Instant;

use crate::client::HttpClient;
use crate::config::Config;
use crate::curl;
use crate::errors::{ReqpadError, Result};
use crate::middleware::auth::AuthConfig;
use crate::models::{ApiRequest, RequestDescriptor, ResponseRecord};
use crate::store::Store;
use crate::vars;

pub struct RequestService {
    store: Arc<Store>,
    client: HttpClient,
    config: Config,
}

impl RequestService {
    pub fn new(store: Arc<Store>, client: HttpClient, config: Config) -> Self {
        Self { store, client, config }
    }

    /// Open the configured store and build a client from `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let store = Store::open(&config.storage_path)?;
        let client = HttpClient::new(&config.client_options())?;
        Ok(Self::new(Arc::new(store), client, config))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The request as it will go on the wire: default headers merged in,
    /// then `{{variables}}` from the active environment substituted.
    pub fn prepare(&self, request: &ApiRequest) -> RequestDescriptor {
        let merged = request.descriptor.with_default_headers(&self.config.default_headers);
        match self.store.active_environment() {
            Some(env) => vars::substitute_request(&merged, &env.variables),
            None => merged,
        }
    }

    /// Execute `request` and record the outcome.
    ///
    /// Transport failures do not fail the call: they come back as a
    /// [`ResponseRecord`] with `is_error` set, and are recorded like any
    /// other response. Only store failures surface as `Err`.
    pub async fn send(&self, request: &ApiRequest, auth: &AuthConfig) -> Result<ResponseRecord> {
        let prepared = self.prepare(request);
        tracing::info!(method = %prepared.method, url = %prepared.url, auth = auth.type_name(), "sending");

        if vars::has_variables(&prepared.url) {
            tracing::warn!(url = %prepared.url, "URL still contains unresolved variables");
        }

        let start = Instant::now();
        let record = match self.client.execute_with(&prepared, request.body_type, auth).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                ResponseRecord::from_error(None, e.message, start.elapsed().as_millis() as u64)
            }
        }
        .for_request(Some(request.id.clone()));

        self.store.insert_response(record.clone())?;

        if self.config.auto_save_requests {
            self.store.save_request(request.clone())?;
        }

        tracing::info!(
            status = record.status_code,
            elapsed_ms = record.response_time,
            "request complete"
        );
        Ok(record)
    }

    /// Parse a curl command into a new request, saving it when `save` is set
    pub fn import_curl(
        &self,
        command: &str,
        name: Option<&str>,
        collection_id: Option<String>,
        save: bool,
    ) -> Result<ApiRequest> {
        let descriptor = curl::parse(command)?;

        if let Some(id) = collection_id.as_deref() {
            if self.store.collection(id).is_none() {
                return Err(ReqpadError::not_found("collection", id));
            }
        }

        let name = match name {
            Some(n) => n.to_string(),
            None => default_name(&descriptor),
        };
        let request = ApiRequest::new(name, descriptor).in_collection(collection_id);

        if save {
            return self.store.save_request(request);
        }
        Ok(request)
    }

    /// Render a stored request as a curl command line
    pub fn export_curl(&self, id: &str) -> Result<String> {
        let request = self
            .store
            .request(id)
            .ok_or_else(|| ReqpadError::not_found("request", id))?;
        Ok(curl::generate(&request.descriptor))
    }
}

/// `METHOD /path`, or `METHOD url` when the URL does not parse
fn default_name(descriptor: &RequestDescriptor) -> String {
    match url::Url::parse(&descriptor.url) {
        Ok(url) => format!("{} {}", descriptor.method, url.path()),
        Err(_) => format!("{} {}", descriptor.method, descriptor.url),
    }
}
