//! Shared in-memory storage used by the default repository implementations.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::error_response;

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for RepositoryError {
    fn into_response(self) -> Response {
        let status = match self {
            RepositoryError::Conflict => StatusCode::CONFLICT,
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self)
    }
}

/// Keyed records behind a mutex; clones share the same map.
#[derive(Debug)]
pub struct MemoryStore<K, V> {
    records: Arc<Mutex<BTreeMap<K, V>>>,
}

impl<K, V> Clone for MemoryStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<K, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self {
            records: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

/// Later pairs win over earlier pairs with the same key.
impl<K: Ord, V> FromIterator<(K, V)> for MemoryStore<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(records: I) -> Self {
        Self {
            records: Arc::new(Mutex::new(records.into_iter().collect())),
        }
    }
}

impl<K, V> MemoryStore<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<K, V>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    pub fn insert_new(&self, key: K, value: V) -> Result<V, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, value.clone());
        Ok(value)
    }

    pub fn replace(&self, key: K, value: V) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    /// Mutate the record under `key` in place, starting from `V::default()` when absent.
    /// The read and the write happen under one lock acquisition.
    pub fn update_or_default<F>(&self, key: K, update: F) -> Result<(), RepositoryError>
    where
        V: Default,
        F: FnOnce(&mut V),
    {
        let mut guard = self.lock()?;
        update(guard.entry(key).or_default());
        Ok(())
    }

    pub fn get(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        Ok(self.lock()?.get(key).cloned())
    }

    pub fn remove(&self, key: &K) -> Result<V, RepositoryError> {
        self.lock()?.remove(key).ok_or(RepositoryError::NotFound)
    }

    /// Snapshot of every record in key order.
    pub fn values(&self) -> Result<Vec<V>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.is_empty())
    }
}
