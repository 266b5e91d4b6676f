//! Collections, environments and variable substitution

use indexmap::IndexMap;

use super::{newest_first, Store, StoreData, Subscription};
use crate::errors::{ReqpadError, Result};
use crate::models::{now_millis, Collection, Environment};
use crate::vars;

impl StoreData {
    pub fn collections_by_recency(&self) -> Vec<Collection> {
        newest_first(self.collections.values().cloned(), |c| c.updated_at)
    }

    pub fn environments_by_recency(&self) -> Vec<Environment> {
        newest_first(self.environments.values().cloned(), |e| e.updated_at)
    }

    pub fn active_environment(&self) -> Option<&Environment> {
        self.environments.values().find(|e| e.is_active)
    }

    /// Keep at most one environment active, preferring `keep`
    fn deactivate_others(&mut self, keep: &str) {
        for env in self.environments.values_mut() {
            if env.id != keep {
                env.is_active = false;
            }
        }
    }
}

impl Store {
    pub fn list_collections(&self) -> Vec<Collection> {
        self.snapshot().collections_by_recency()
    }

    pub fn collection(&self, id: &str) -> Option<Collection> {
        self.snapshot().collections.get(id).cloned()
    }

    /// Collections whose name contains `query`, ignoring case
    pub fn search_collections(&self, query: &str) -> Vec<Collection> {
        let needle = query.to_lowercase();
        self.list_collections()
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn create_collection(&self, collection: Collection) -> Result<Collection> {
        let created = collection.clone();
        self.mutate(move |data| {
            data.collections.insert(collection.id.clone(), collection);
            Ok(())
        })?;
        Ok(created)
    }

    pub fn update_collection(&self, mut collection: Collection) -> Result<Collection> {
        collection.updated_at = now_millis();
        let updated = collection.clone();
        self.mutate(move |data| match data.collections.get_mut(&collection.id) {
            Some(slot) => {
                *slot = collection;
                Ok(())
            }
            None => Err(ReqpadError::not_found("collection", collection.id)),
        })?;
        Ok(updated)
    }

    /// Delete a collection with its requests and their responses
    pub fn delete_collection(&self, id: &str) -> Result<bool> {
        self.mutate(|data| {
            if data.collections.shift_remove(id).is_none() {
                return Ok(false);
            }
            let request_ids: Vec<String> = data
                .requests
                .values()
                .filter(|r| r.collection_id.as_deref() == Some(id))
                .map(|r| r.id.clone())
                .collect();
            data.requests.retain(|_, r| r.collection_id.as_deref() != Some(id));
            data.responses.retain(|_, r| {
                r.request_id.as_ref().is_none_or(|rid| !request_ids.contains(rid))
            });
            tracing::debug!(id, requests = request_ids.len(), "deleted collection");
            Ok(true)
        })
    }

    pub fn list_environments(&self) -> Vec<Environment> {
        self.snapshot().environments_by_recency()
    }

    pub fn environment(&self, id: &str) -> Option<Environment> {
        self.snapshot().environments.get(id).cloned()
    }

    pub fn active_environment(&self) -> Option<Environment> {
        self.snapshot().active_environment().cloned()
    }

    /// Add an environment. Creating one as active deactivates the rest.
    pub fn create_environment(&self, env: Environment) -> Result<Environment> {
        let created = env.clone();
        self.mutate(move |data| {
            if env.is_active {
                data.deactivate_others(&env.id);
            }
            data.environments.insert(env.id.clone(), env);
            Ok(())
        })?;
        Ok(created)
    }

    pub fn update_environment(&self, mut env: Environment) -> Result<Environment> {
        env.updated_at = now_millis();
        let updated = env.clone();
        self.mutate(move |data| {
            if !data.environments.contains_key(&env.id) {
                return Err(ReqpadError::not_found("environment", env.id));
            }
            if env.is_active {
                data.deactivate_others(&env.id);
            }
            data.environments.insert(env.id.clone(), env);
            Ok(())
        })?;
        Ok(updated)
    }

    pub fn delete_environment(&self, id: &str) -> Result<bool> {
        self.mutate(|data| Ok(data.environments.shift_remove(id).is_some()))
    }

    /// Make `id` the only active environment.
    ///
    /// All active flags are cleared in the same commit, so an unknown `id`
    /// leaves no environment active. Returns whether `id` exists.
    pub fn set_active_environment(&self, id: &str) -> Result<bool> {
        let found = self.mutate(|data| {
            for env in data.environments.values_mut() {
                env.is_active = false;
            }
            match data.environments.get_mut(id) {
                Some(env) => {
                    env.is_active = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        })?;
        tracing::debug!(id, found, "activated environment");
        Ok(found)
    }

    /// Substitute `{{name}}` with the active environment's variables.
    ///
    /// Returns `text` unchanged when no environment is active.
    pub fn replace_variables(&self, text: &str) -> String {
        match self.snapshot().active_environment() {
            Some(env) => vars::substitute(text, &env.variables),
            None => text.to_string(),
        }
    }

    /// [`replace_variables`](Self::replace_variables) over every value of a map
    pub fn replace_variables_in_map(&self, map: &IndexMap<String, String>) -> IndexMap<String, String> {
        match self.snapshot().active_environment() {
            Some(env) => vars::substitute_map(map, &env.variables),
            None => map.clone(),
        }
    }

    pub fn watch_collections(&self) -> Subscription<Vec<Collection>> {
        self.subscribe(StoreData::collections_by_recency)
    }

    pub fn watch_environments(&self) -> Subscription<Vec<Environment>> {
        self.subscribe(StoreData::environments_by_recency)
    }

    pub fn watch_active_environment(&self) -> Subscription<Option<Environment>> {
        self.subscribe(|data| data.active_environment().cloned())
    }
}
