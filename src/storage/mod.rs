//! Local persistence: a flat key/value text store.
//!
//! Collections are serialized to JSON-array text and written under a single
//! key, so any backend that can hold strings by key is enough. Two backends
//! ship with the crate:
//!
//! - [`InMemoryStore`] for tests and embedding.
//! - [`JsonFileStore`] which keeps the whole map in one JSON file on disk.
//!
//! ## Example
//!
//! ```
//! use docshelf::{InMemoryStore, KeyValueStore};
//!
//! let store = InMemoryStore::new();
//! store.set("documents_u1", "[]").unwrap();
//! assert_eq!(store.get("documents_u1").unwrap().as_deref(), Some("[]"));
//! ```

mod in_memory;
mod json_file;

use std::fmt;
use std::sync::Arc;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

/// Key/value text storage with no transactions.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Error type for key/value storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// An internal lock was poisoned.
    LockPoisoned(&'static str),
    /// Stored text could not be read back.
    Read { key: String, message: String },
    /// A value could not be written.
    Write { key: String, message: String },
    /// A collection could not be serialized.
    Serde(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Read { key, message } => {
                write!(f, "failed to read '{}': {}", key, message)
            }
            StorageError::Write { key, message } => {
                write!(f, "failed to write '{}': {}", key, message)
            }
            StorageError::Serde(message) => write!(f, "serialization error: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}
