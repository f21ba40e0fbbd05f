//! Per-key serialization of read-modify-write sequences.
//!
//! Callers that may complete in any order (for example several file reads
//! finishing at once) route their storage mutation through
//! [`KeyedQueue::run`]. Work on the same key runs one at a time; work on
//! different keys does not wait.

mod lock;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub use lock::Lock;

use crate::storage::StorageError;

#[derive(Default)]
pub struct KeyedQueue {
    locks: Mutex<HashMap<String, Arc<Lock>>>,
}

/// Releases the key's lock when dropped, including on early return.
struct Held(Arc<Lock>);

impl Drop for Held {
    fn drop(&mut self) {
        self.0.unlock();
    }
}

impl KeyedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_lock(&self, key: &str) -> Result<Arc<Lock>, StorageError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| StorageError::LockPoisoned("queue map"))?;
        Ok(locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Lock::new()))
            .clone())
    }

    /// Run `work` while holding the lock for `key`.
    ///
    /// `work` must not await; the lock blocks the calling thread.
    pub fn run<T, F>(&self, key: &str, work: F) -> Result<T, StorageError>
    where
        F: FnOnce() -> Result<T, StorageError>,
    {
        let lock = self.ensure_lock(key)?;
        lock.lock();
        let _held = Held(lock);
        work()
    }

    /// Whether `key` is currently held.
    pub fn is_busy(&self, key: &str) -> Result<bool, StorageError> {
        let locks = self
            .locks
            .lock()
            .map_err(|_| StorageError::LockPoisoned("queue map"))?;
        Ok(locks.get(key).map(|l| l.is_locked()).unwrap_or(false))
    }
}
