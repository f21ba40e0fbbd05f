use super::{Documents, TextDocument};
use crate::collection::CollectionRepository;
use crate::config::StoreConfig;
use crate::session::UserId;
use crate::storage::{KeyValueStore, StorageError};

/// Per-user persistence for text documents.
pub struct DocumentStore<S> {
    repo: CollectionRepository<S, TextDocument>,
    config: StoreConfig,
}

impl<S: KeyValueStore> DocumentStore<S> {
    pub fn new(store: S, config: StoreConfig) -> Self {
        Self {
            repo: CollectionRepository::new(store),
            config,
        }
    }

    /// The documents owned by `user`; empty when nothing usable is stored.
    pub fn load(&self, user: &UserId) -> Documents {
        self.repo.load(&self.config.documents_key(user))
    }

    /// Write `docs` under `user`'s key. Without a user nothing is written.
    pub fn persist(&self, user: Option<&UserId>, docs: &Documents) -> Result<(), StorageError> {
        match user {
            Some(user) => self.repo.persist(&self.config.documents_key(user), docs),
            None => Ok(()),
        }
    }
}
