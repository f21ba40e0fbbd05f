//! CollectionRepository - typed load/persist of a collection by key.

use std::marker::PhantomData;

use super::{Collection, Record};
use crate::storage::{KeyValueStore, StorageError};

/// Typed wrapper that reads and writes `Collection<T>` as JSON-array text.
pub struct CollectionRepository<S, T> {
    store: S,
    _marker: PhantomData<T>,
}

impl<S: Clone, T> Clone for CollectionRepository<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S: KeyValueStore, T: Record> CollectionRepository<S, T> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the collection stored under `key`.
    ///
    /// Never fails: an absent key, unreadable storage, text that is not a
    /// JSON array of `T`, or any record failing [`Record::is_well_formed`]
    /// all yield an empty collection.
    pub fn load(&self, key: &str) -> Collection<T> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return Collection::new(),
            Err(e) => {
                tracing::warn!(key, collection = T::COLLECTION, error = %e, "failed to read collection");
                return Collection::new();
            }
        };

        let items: Vec<T> = match serde_json::from_str(&text) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key, collection = T::COLLECTION, error = %e, "discarding malformed collection");
                return Collection::new();
            }
        };

        if let Some(bad) = items.iter().position(|r| !r.is_well_formed()) {
            tracing::warn!(
                key,
                collection = T::COLLECTION,
                index = bad,
                "discarding collection with malformed record"
            );
            return Collection::new();
        }

        Collection::from(items)
    }

    /// Write `collection` under `key`, replacing what was there.
    pub fn persist(&self, key: &str, collection: &Collection<T>) -> Result<(), StorageError> {
        let text =
            serde_json::to_string(collection).map_err(|e| StorageError::Serde(e.to_string()))?;
        self.store.set(key, &text)
    }
}
