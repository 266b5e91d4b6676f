//! Persistent store for requests, responses, collections and environments
//!
//! The store keeps the full data set in memory behind a
//! [`tokio::sync::watch`] channel and mirrors it to a single JSON file.
//!
//! Every mutation follows the same path:
//!
//! 1. take the write lock
//! 2. clone the current snapshot and apply the change to the clone
//! 3. write the clone to disk
//! 4. publish the clone to subscribers
//!
//! If step 3 fails nothing is published, so readers never observe state that
//! was not persisted. Readers never take the lock.

mod file;
mod history;
mod requests;
mod subscription;
mod workspace;

pub use subscription::Subscription;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::errors::{ReqpadError, Result};
use crate::models::{ApiRequest, Collection, Environment, ResponseRecord};

/// Everything the store holds, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub requests: IndexMap<String, ApiRequest>,
    #[serde(default)]
    pub responses: IndexMap<String, ResponseRecord>,
    #[serde(default)]
    pub collections: IndexMap<String, Collection>,
    #[serde(default)]
    pub environments: IndexMap<String, Environment>,
}

/// Counts of entities merged by [`Store::import_from`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub requests: usize,
    pub responses: usize,
    pub collections: usize,
    pub environments: usize,
}

pub struct Store {
    path: Option<PathBuf>,
    state: watch::Sender<Arc<StoreData>>,
    write_lock: Mutex<()>,
}

impl Store {
    /// Open the store backed by `path`, creating it on first write
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = file::load(&path)?;
        tracing::debug!(
            path = %path.display(),
            requests = data.requests.len(),
            responses = data.responses.len(),
            "opened store"
        );
        Ok(Self::with_data(Some(path), data))
    }

    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::with_data(None, StoreData::default())
    }

    fn with_data(path: Option<PathBuf>, data: StoreData) -> Self {
        let (state, _) = watch::channel(Arc::new(data));
        Self {
            path,
            state,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The current committed state
    pub fn snapshot(&self) -> Arc<StoreData> {
        Arc::clone(&self.state.borrow())
    }

    /// Apply `change` to a copy of the data, persist it, then publish it.
    ///
    /// When `change` fails nothing is written or published.
    fn mutate<R>(&self, change: impl FnOnce(&mut StoreData) -> Result<R>) -> Result<R> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ReqpadError::Store("store lock poisoned".to_string()))?;

        let mut next = StoreData::clone(&self.state.borrow());
        let output = change(&mut next)?;

        if let Some(path) = &self.path {
            file::save(path, &next)?;
        }
        self.state.send_replace(Arc::new(next));
        Ok(output)
    }

    fn subscribe<T>(&self, view: impl Fn(&StoreData) -> T + Send + Sync + 'static) -> Subscription<T> {
        Subscription::new(self.state.subscribe(), view)
    }

    /// Write the whole store to `path` as JSON
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let data = self.snapshot();
        file::save(path, &data)?;
        tracing::info!(path = %path.display(), "exported store");
        Ok(())
    }

    /// Merge a previously exported store into this one.
    ///
    /// Entities are matched by id; imported entities replace existing ones.
    /// Importing never changes which environment is active.
    pub fn import_from(&self, path: &Path) -> Result<ImportSummary> {
        if !path.exists() {
            return Err(ReqpadError::Store(format!("{} does not exist", path.display())));
        }
        let incoming = file::load(path)?;

        let summary = self.mutate(|data| {
            let summary = ImportSummary {
                requests: incoming.requests.len(),
                responses: incoming.responses.len(),
                collections: incoming.collections.len(),
                environments: incoming.environments.len(),
            };

            data.requests.extend(incoming.requests);
            data.responses.extend(incoming.responses);
            data.collections.extend(incoming.collections);
            for (id, mut env) in incoming.environments {
                env.is_active = data.environments.get(&id).is_some_and(|e| e.is_active);
                data.environments.insert(id, env);
            }
            Ok(summary)
        })?;

        tracing::info!(path = %path.display(), ?summary, "imported store");
        Ok(summary)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Entries sorted newest first by `key`
fn newest_first<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> i64) -> Vec<T> {
    let mut out: Vec<T> = items.collect();
    out.sort_by_key(|item| std::cmp::Reverse(key(item)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestDescriptor;

    #[test]
    fn test_failed_change_publishes_nothing() {
        let store = Store::in_memory();
        let mut sub = store.watch_requests();
        let result: Result<()> = store.mutate(|data| {
            data.requests.clear();
            Err(ReqpadError::Store("boom".to_string()))
        });
        assert!(result.is_err());
        assert!(!sub.rx.has_changed().unwrap());
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the store file should be makes the rename fail
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();

        let store = Store::with_data(Some(path), StoreData::default());
        let request = ApiRequest::new("r", RequestDescriptor::new("https://x.test"));
        assert!(store.save_request(request).is_err());
        assert!(store.list_requests().is_empty());
    }

    #[test]
    fn test_newest_first() {
        let sorted = newest_first([1i64, 3, 2].into_iter(), |n| *n);
        assert_eq!(sorted, vec![3, 2, 1]);
    }
}
