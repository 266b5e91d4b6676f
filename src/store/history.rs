//! Recorded responses

use super::{newest_first, Store, StoreData, Subscription};
use crate::errors::Result;
use crate::models::ResponseRecord;

impl StoreData {
    /// All responses, newest first
    pub fn responses_by_recency(&self) -> Vec<ResponseRecord> {
        newest_first(self.responses.values().cloned(), |r| r.timestamp)
    }

    pub fn responses_for_request(&self, request_id: &str) -> Vec<ResponseRecord> {
        newest_first(
            self.responses
                .values()
                .filter(|r| r.request_id.as_deref() == Some(request_id))
                .cloned(),
            |r| r.timestamp,
        )
    }
}

impl Store {
    pub fn list_responses(&self) -> Vec<ResponseRecord> {
        self.snapshot().responses_by_recency()
    }

    pub fn responses_for_request(&self, request_id: &str) -> Vec<ResponseRecord> {
        self.snapshot().responses_for_request(request_id)
    }

    pub fn response(&self, id: &str) -> Option<ResponseRecord> {
        self.snapshot().responses.get(id).cloned()
    }

    pub fn recent_responses(&self, limit: usize) -> Vec<ResponseRecord> {
        let mut responses = self.list_responses();
        responses.truncate(limit);
        responses
    }

    pub fn insert_response(&self, record: ResponseRecord) -> Result<()> {
        self.mutate(move |data| {
            data.responses.insert(record.id.clone(), record);
            Ok(())
        })
    }

    pub fn delete_response(&self, id: &str) -> Result<bool> {
        self.mutate(|data| Ok(data.responses.shift_remove(id).is_some()))
    }

    /// Returns how many responses were removed
    pub fn delete_responses_for_request(&self, request_id: &str) -> Result<usize> {
        self.mutate(|data| {
            let before = data.responses.len();
            data.responses.retain(|_, r| r.request_id.as_deref() != Some(request_id));
            Ok(before - data.responses.len())
        })
    }

    /// Remove responses recorded strictly before `timestamp` (Unix millis)
    pub fn delete_responses_older_than(&self, timestamp: i64) -> Result<usize> {
        let removed = self.mutate(|data| {
            let before = data.responses.len();
            data.responses.retain(|_, r| r.timestamp >= timestamp);
            Ok(before - data.responses.len())
        })?;
        tracing::debug!(removed, timestamp, "pruned response history");
        Ok(removed)
    }

    pub fn clear_responses(&self) -> Result<usize> {
        self.mutate(|data| {
            let count = data.responses.len();
            data.responses.clear();
            Ok(count)
        })
    }

    pub fn watch_responses(&self) -> Subscription<Vec<ResponseRecord>> {
        self.subscribe(StoreData::responses_by_recency)
    }

    pub fn watch_responses_for_request(&self, request_id: impl Into<String>) -> Subscription<Vec<ResponseRecord>> {
        let request_id = request_id.into();
        self.subscribe(move |data| data.responses_for_request(&request_id))
    }
}
