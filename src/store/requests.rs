//! Saved requests

use super::{newest_first, Store, StoreData, Subscription};
use crate::errors::{ReqpadError, Result};
use crate::models::{now_millis, ApiRequest};

impl StoreData {
    /// All saved requests, most recently updated first
    pub fn requests_by_recency(&self) -> Vec<ApiRequest> {
        newest_first(self.requests.values().cloned(), |r| r.updated_at)
    }

    pub fn requests_in_collection(&self, collection_id: &str) -> Vec<ApiRequest> {
        newest_first(
            self.requests
                .values()
                .filter(|r| r.collection_id.as_deref() == Some(collection_id))
                .cloned(),
            |r| r.updated_at,
        )
    }

    fn remove_request(&mut self, id: &str) -> bool {
        let removed = self.requests.shift_remove(id).is_some();
        if removed {
            self.responses.retain(|_, r| r.request_id.as_deref() != Some(id));
        }
        removed
    }
}

impl Store {
    pub fn list_requests(&self) -> Vec<ApiRequest> {
        self.snapshot().requests_by_recency()
    }

    pub fn requests_in_collection(&self, collection_id: &str) -> Vec<ApiRequest> {
        self.snapshot().requests_in_collection(collection_id)
    }

    pub fn request(&self, id: &str) -> Option<ApiRequest> {
        self.snapshot().requests.get(id).cloned()
    }

    /// Requests whose name or URL contains `query`, ignoring case
    pub fn search_requests(&self, query: &str) -> Vec<ApiRequest> {
        let needle = query.to_lowercase();
        self.snapshot()
            .requests_by_recency()
            .into_iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.descriptor.url.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn recent_requests(&self, limit: usize) -> Vec<ApiRequest> {
        let mut requests = self.list_requests();
        requests.truncate(limit);
        requests
    }

    /// Insert or replace a request, stamping `updated_at`
    pub fn save_request(&self, mut request: ApiRequest) -> Result<ApiRequest> {
        request.updated_at = now_millis();
        let saved = request.clone();
        self.mutate(move |data| {
            data.requests.insert(request.id.clone(), request);
            Ok(())
        })?;
        tracing::debug!(id = %saved.id, name = %saved.name, "saved request");
        Ok(saved)
    }

    /// Replace an existing request, stamping `updated_at`
    pub fn update_request(&self, mut request: ApiRequest) -> Result<ApiRequest> {
        request.updated_at = now_millis();
        let saved = request.clone();
        self.mutate(move |data| match data.requests.get_mut(&request.id) {
            Some(slot) => {
                *slot = request;
                Ok(())
            }
            None => Err(ReqpadError::not_found("request", request.id)),
        })?;
        Ok(saved)
    }

    /// Delete a request and every response recorded for it
    pub fn delete_request(&self, id: &str) -> Result<bool> {
        let removed = self.mutate(|data| Ok(data.remove_request(id)))?;
        if removed {
            tracing::debug!(id, "deleted request");
        }
        Ok(removed)
    }

    /// Save a copy of a request under a new id
    pub fn duplicate_request(&self, id: &str) -> Result<ApiRequest> {
        let original = self
            .request(id)
            .ok_or_else(|| ReqpadError::not_found("request", id))?;

        let mut copy = ApiRequest::new(format!("{} (Copy)", original.name), original.descriptor);
        copy.body_type = original.body_type;
        copy.collection_id = original.collection_id;
        self.save_request(copy)
    }

    pub fn watch_requests(&self) -> Subscription<Vec<ApiRequest>> {
        self.subscribe(StoreData::requests_by_recency)
    }

    pub fn watch_requests_in_collection(&self, collection_id: impl Into<String>) -> Subscription<Vec<ApiRequest>> {
        let collection_id = collection_id.into();
        self.subscribe(move |data| data.requests_in_collection(&collection_id))
    }

    pub fn watch_request(&self, id: impl Into<String>) -> Subscription<Option<ApiRequest>> {
        let id = id.into();
        self.subscribe(move |data| data.requests.get(&id).cloned())
    }
}
