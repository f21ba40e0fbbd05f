use std::fmt;
use std::io;

use futures::future::join_all;

use super::{FileDocument, Files, PickedFile};
use crate::collection::CollectionRepository;
use crate::config::StoreConfig;
use crate::queue::KeyedQueue;
use crate::session::UserId;
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug)]
pub enum IngestError {
    /// The file's bytes could not be read.
    Read { name: String, source: io::Error },
    /// The reader produced a different number of bytes than the file declared.
    SizeMismatch {
        name: String,
        declared: u64,
        actual: u64,
    },
    /// The encoded file could not be written.
    Storage(StorageError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Read { name, source } => write!(f, "failed to read '{}': {}", name, source),
            IngestError::SizeMismatch {
                name,
                declared,
                actual,
            } => write!(
                f,
                "'{}' declared {} bytes but {} were read",
                name, declared, actual
            ),
            IngestError::Storage(e) => write!(f, "failed to store file: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Read { source, .. } => Some(source),
            IngestError::Storage(e) => Some(e),
            IngestError::SizeMismatch { .. } => None,
        }
    }
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        IngestError::Storage(err)
    }
}

/// Persistence for uploaded files.
///
/// Every mutation re-reads the stored collection and writes the result back
/// while holding the key's slot in a [`KeyedQueue`], so uploads that finish
/// in any order all end up in the collection.
pub struct FileStore<S> {
    repo: CollectionRepository<S, FileDocument>,
    config: StoreConfig,
    queue: KeyedQueue,
}

impl<S: KeyValueStore> FileStore<S> {
    pub fn new(store: S, config: StoreConfig) -> Self {
        Self {
            repo: CollectionRepository::new(store),
            config,
            queue: KeyedQueue::new(),
        }
    }

    /// The files visible to `user`; with a global scope every user sees the
    /// same collection.
    pub fn load(&self, user: &UserId) -> Files {
        self.repo.load(&self.config.files_key(user))
    }

    /// Overwrite the stored collection with `files`.
    pub fn persist(&self, user: &UserId, files: &Files) -> Result<(), StorageError> {
        let key = self.config.files_key(user);
        self.queue.run(&key, || self.repo.persist(&key, files))
    }

    /// Append `file` to whatever is stored now and write the result.
    pub fn append(&self, user: &UserId, file: FileDocument) -> Result<Files, StorageError> {
        let key = self.config.files_key(user);
        self.queue.run(&key, || {
            let next = self.repo.load(&key).appended(file);
            self.repo.persist(&key, &next)?;
            Ok(next)
        })
    }

    /// Remove the file with `id` from what is stored now and write the result.
    pub fn delete(&self, user: &UserId, id: &str) -> Result<Files, StorageError> {
        let key = self.config.files_key(user);
        self.queue.run(&key, || {
            let next = self.repo.load(&key).without(id);
            self.repo.persist(&key, &next)?;
            Ok(next)
        })
    }

    /// Read `file` to the end, encode it and append it.
    pub async fn ingest(&self, user: &UserId, file: PickedFile) -> Result<FileDocument, IngestError> {
        let (name, mime_type, bytes) = file.read_all().await?;
        let doc = FileDocument::from_bytes(name, mime_type, &bytes);
        self.append(user, doc.clone())?;

        tracing::info!(
            id = %doc.id,
            name = %doc.name,
            size = doc.size_bytes,
            "file stored"
        );
        Ok(doc)
    }

    /// Ingest several files concurrently. Results are in the order given,
    /// whatever order the reads finish in.
    pub async fn ingest_all(
        &self,
        user: &UserId,
        files: Vec<PickedFile>,
    ) -> Vec<Result<FileDocument, IngestError>> {
        let results = join_all(files.into_iter().map(|file| self.ingest(user, file))).await;
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            tracing::error!(error = %err, "file upload failed");
        }
        results
    }
}
