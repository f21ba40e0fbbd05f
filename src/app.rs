//! DocumentManager - the signed-in workspace wired to its stores.
//!
//! Holds the session, the current view and the in-memory collections for the
//! signed-in user. Every mutation is written through to storage before the
//! call returns. Write failures are logged and the in-memory value is kept,
//! so the workspace stays usable.
//!
//! ## Example
//!
//! ```
//! use docshelf::{DocumentManager, InMemoryStore, StaticAuthProvider, StoreConfig, UserProfile, ViewState, Tab};
//!
//! let auth = StaticAuthProvider::new(UserProfile::new("u1"));
//! let mut app = DocumentManager::new(InMemoryStore::new(), auth, StoreConfig::default());
//!
//! app.sign_in().unwrap();
//! assert_eq!(app.view_state(), ViewState::Workspace(Tab::Documents));
//!
//! app.add_document("Note", "Hello");
//! assert_eq!(app.documents().len(), 1);
//! ```

use std::path::PathBuf;

use crate::config::StoreConfig;
use crate::document::{self, DocumentStore, Documents};
use crate::files::{
    self, DownloadTarget, FileActionError, FileDocument, FilePicker, FileStore, FileViewer, Files,
    IngestError, PickedFile,
};
use crate::session::{AuthError, AuthProvider, AuthStateChange, SessionStore, UserProfile};
use crate::storage::KeyValueStore;
use crate::view::{Tab, ViewController, ViewEvent, ViewState};

pub struct DocumentManager<S, A> {
    auth: A,
    session: SessionStore<S>,
    view: ViewController,
    document_store: DocumentStore<S>,
    file_store: FileStore<S>,
    documents: Documents,
    files: Files,
}

impl<S, A> DocumentManager<S, A>
where
    S: KeyValueStore + Clone,
    A: AuthProvider,
{
    pub fn new(store: S, auth: A, config: StoreConfig) -> Self {
        let mut session = SessionStore::new(store.clone(), config.session_key.clone());
        session.on_auth_state_change(|change: AuthStateChange| match change.user {
            Some(user) => tracing::info!(uid = %user.uid, name = user.label(), "auth state: signed in"),
            None => tracing::info!("auth state: signed out"),
        });

        Self {
            auth,
            session,
            view: ViewController::new(),
            document_store: DocumentStore::new(store.clone(), config.clone()),
            file_store: FileStore::new(store, config),
            documents: Documents::new(),
            files: Files::new(),
        }
    }

    /// Pick up a session still held by the provider, or one mirrored by a
    /// previous run, and open the workspace for it.
    pub fn start(&mut self) -> ViewState {
        if let Some(profile) = self.auth.current_user() {
            self.session.set_user(Some(profile));
        } else {
            self.session.restore();
        }

        if self.session.is_signed_in() {
            self.enter_workspace();
        }
        self.view.state()
    }

    pub fn sign_in(&mut self) -> Result<UserProfile, AuthError> {
        match self.session.sign_in(&mut self.auth) {
            Ok(profile) => {
                self.enter_workspace();
                Ok(profile)
            }
            Err(e) => {
                self.view.apply(ViewEvent::SignInFailed);
                Err(e)
            }
        }
    }

    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        let result = self.session.sign_out(&mut self.auth);
        self.documents = Documents::new();
        self.files = Files::new();
        self.view.apply(ViewEvent::SignedOut);
        result
    }

    fn enter_workspace(&mut self) {
        self.reload();
        self.view.apply(ViewEvent::SignedIn);
    }

    /// Re-read both collections for the current user.
    pub fn reload(&mut self) {
        match self.session.user_id() {
            Some(user) => {
                self.documents = self.document_store.load(user);
                self.files = self.file_store.load(user);
            }
            None => {
                self.documents = Documents::new();
                self.files = Files::new();
            }
        }
    }

    pub fn select_tab(&mut self, tab: Tab) -> ViewState {
        self.view.apply(ViewEvent::SelectTab(tab));
        self.view.state()
    }

    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    pub fn session_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.session
    }

    pub fn documents(&self) -> &Documents {
        &self.documents
    }

    pub fn files(&self) -> &Files {
        &self.files
    }

    /// Add a text document. Returns false when the title or content is empty.
    pub fn add_document(&mut self, title: &str, content: &str) -> bool {
        match document::try_add(&self.documents, title, content) {
            Ok(next) => {
                self.replace_documents(next);
                true
            }
            Err(reason) => {
                tracing::debug!(%reason, "document rejected");
                false
            }
        }
    }

    /// Delete a text document. Returns false for an unknown id.
    pub fn delete_document(&mut self, id: &str) -> bool {
        if !self.documents.contains(id) {
            return false;
        }
        let next = document::remove(&self.documents, id);
        self.replace_documents(next);
        true
    }

    fn replace_documents(&mut self, next: Documents) {
        if let Err(e) = self.document_store.persist(self.session.user_id(), &next) {
            tracing::error!(error = %e, "failed to persist documents");
        }
        self.documents = next;
    }

    /// Upload files concurrently, then refresh the file list from storage.
    /// Without a signed-in user nothing is read.
    pub async fn upload(&mut self, picked: Vec<PickedFile>) -> Vec<Result<FileDocument, IngestError>> {
        let Some(user) = self.session.user_id().cloned() else {
            tracing::warn!(count = picked.len(), "upload ignored while signed out");
            return Vec::new();
        };

        let results = self.file_store.ingest_all(&user, picked).await;
        self.files = self.file_store.load(&user);
        results
    }

    pub async fn upload_from<P: FilePicker + ?Sized>(
        &mut self,
        picker: &mut P,
    ) -> Vec<Result<FileDocument, IngestError>> {
        let picked = picker.pick();
        self.upload(picked).await
    }

    /// Delete an uploaded file. Returns false for an unknown id.
    pub fn delete_file(&mut self, id: &str) -> bool {
        let Some(user) = self.session.user_id().cloned() else {
            return false;
        };
        if !self.files.contains(id) {
            return false;
        }

        match self.file_store.delete(&user, id) {
            Ok(stored) => self.files = stored,
            Err(e) => {
                tracing::error!(id, error = %e, "failed to persist file deletion");
                self.files = files::remove(&self.files, id);
            }
        }
        true
    }

    pub fn view_file<V: FileViewer + ?Sized>(
        &self,
        id: &str,
        viewer: &mut V,
    ) -> Result<(), FileActionError> {
        files::view(&self.files, id, viewer)
    }

    pub fn download_file<D: DownloadTarget + ?Sized>(
        &self,
        id: &str,
        target: &D,
    ) -> Result<PathBuf, FileActionError> {
        files::download(&self.files, id, target)
    }
}
