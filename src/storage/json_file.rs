//! JsonFileStore - a key/value map persisted as one JSON object on disk.
//!
//! The whole map is rewritten on every mutation using a temp file + rename,
//! so a crash mid-write leaves the previous file intact.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{KeyValueStore, StorageError};

pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; a file
    /// that is not a JSON object of strings is a read error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<BTreeMap<String, String>>(&text).map_err(|e| {
                StorageError::Read {
                    key: path.display().to_string(),
                    message: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::Read {
                    key: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened json store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, key: &str, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |e: io::Error| StorageError::Write {
            key: key.to_string(),
            message: e.to_string(),
        };

        let text =
            serde_json::to_string_pretty(entries).map_err(|e| StorageError::Serde(e.to_string()))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }

    fn mutate<F>(&self, key: &str, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::LockPoisoned("write"))?;
        let mut next = entries.clone();
        apply(&mut next);
        self.flush(key, &next)?;
        *entries = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(key, |entries| {
            entries.remove(key);
        })
    }
}
