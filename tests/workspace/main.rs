//! Integration tests for the signed-in workspace: session, view and
//! write-through of both collections.

use std::sync::{Arc, Mutex};

use docshelf::{
    AuthError, AuthStateChange, DocumentManager, FilePicker, InMemoryStore, JsonFileStore,
    KeyValueStore, PickedFile, StaticAuthProvider, StoreConfig, Tab, UserProfile, ViewState,
};

struct OnePicker(Option<PickedFile>);

impl FilePicker for OnePicker {
    fn pick(&mut self) -> Vec<PickedFile> {
        self.0.take().into_iter().collect()
    }
}

fn signed_in(kv: &InMemoryStore, uid: &str) -> DocumentManager<InMemoryStore, StaticAuthProvider> {
    let auth = StaticAuthProvider::new(UserProfile::new(uid).with_display_name("Test User"));
    let mut app = DocumentManager::new(kv.clone(), auth, StoreConfig::default());
    app.sign_in().unwrap();
    app
}

#[test]
fn starts_signed_out() {
    let mut app = DocumentManager::new(
        InMemoryStore::new(),
        StaticAuthProvider::unavailable(),
        StoreConfig::default(),
    );
    assert_eq!(app.start(), ViewState::SignedOut);
    assert!(app.user().is_none());
    assert!(app.documents().is_empty());
}

#[test]
fn failed_sign_in_stays_on_landing_view() {
    let kv = InMemoryStore::new();
    let auth = StaticAuthProvider::failing(AuthError::Rejected("popup closed".into()));
    let mut app = DocumentManager::new(kv.clone(), auth, StoreConfig::default());

    let err = app.sign_in().unwrap_err();
    assert_eq!(err, AuthError::Rejected("popup closed".into()));
    assert_eq!(app.view_state(), ViewState::SignedOut);
    assert!(kv.get("user").unwrap().is_none());
}

#[test]
fn sign_in_opens_documents_tab() {
    let kv = InMemoryStore::new();
    let app = signed_in(&kv, "u1");

    assert_eq!(app.view_state(), ViewState::Workspace(Tab::Documents));
    assert_eq!(app.user().unwrap().label(), "Test User");
    assert!(kv.get("user").unwrap().is_some());
}

#[test]
fn tab_selection_needs_a_session() {
    let kv = InMemoryStore::new();
    let mut app = DocumentManager::new(
        kv.clone(),
        StaticAuthProvider::unavailable(),
        StoreConfig::default(),
    );
    assert_eq!(app.select_tab(Tab::Files), ViewState::SignedOut);

    let mut app = signed_in(&kv, "u1");
    assert_eq!(app.select_tab(Tab::Files), ViewState::Workspace(Tab::Files));
    assert_eq!(
        app.select_tab(Tab::Documents),
        ViewState::Workspace(Tab::Documents)
    );
}

#[test]
fn documents_are_written_through() {
    let kv = InMemoryStore::new();
    let mut app = signed_in(&kv, "u1");

    assert!(app.add_document("Note", "Hello"));
    assert!(!app.add_document("", "ignored"));
    assert_eq!(app.documents().len(), 1);

    let stored: serde_json::Value =
        serde_json::from_str(&kv.get("documents_u1").unwrap().unwrap()).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["title"], "Note");

    let id = app.documents().last().unwrap().id.clone();
    assert!(app.delete_document(&id));
    assert!(!app.delete_document(&id));
    assert_eq!(kv.get("documents_u1").unwrap().unwrap(), "[]");
}

#[test]
fn restart_restores_session_and_collections() {
    let kv = InMemoryStore::new();
    {
        let mut app = signed_in(&kv, "u1");
        app.add_document("Kept", "across restarts");
    }

    let mut app = DocumentManager::new(
        kv.clone(),
        StaticAuthProvider::unavailable(),
        StoreConfig::default(),
    );
    assert_eq!(app.start(), ViewState::Workspace(Tab::Documents));
    assert_eq!(app.user().unwrap().uid.as_str(), "u1");
    assert_eq!(app.documents().last().unwrap().title, "Kept");
}

#[test]
fn sign_out_clears_view_and_collections() {
    let kv = InMemoryStore::new();
    let mut app = signed_in(&kv, "u1");
    app.add_document("a", "b");

    app.sign_out().unwrap();
    assert_eq!(app.view_state(), ViewState::SignedOut);
    assert!(app.documents().is_empty());
    assert!(kv.get("user").unwrap().is_none());
    assert!(kv.get("documents_u1").unwrap().is_some());
}

#[test]
fn switching_users_does_not_merge() {
    let kv = InMemoryStore::new();
    {
        let mut alice = signed_in(&kv, "alice");
        alice.add_document("alice's", "note");
        alice.sign_out().unwrap();
    }

    let bob = signed_in(&kv, "bob");
    assert!(bob.documents().is_empty());
}

#[test]
fn auth_listeners_see_sign_in_and_out() {
    let kv = InMemoryStore::new();
    let auth = StaticAuthProvider::new(UserProfile::new("u1"));
    let mut app = DocumentManager::new(kv, auth, StoreConfig::default());

    let seen = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        app.session_mut()
            .on_auth_state_change(move |change: AuthStateChange| {
                seen.lock().unwrap().push(change.user.is_some());
            });
    }

    app.sign_in().unwrap();
    app.sign_out().unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
}

#[tokio::test]
async fn upload_refreshes_files_from_storage() {
    let kv = InMemoryStore::new();
    let mut app = signed_in(&kv, "u1");

    let mut picker = OnePicker(Some(PickedFile::from_bytes(
        "hello.txt",
        "text/plain",
        b"hello".to_vec(),
    )));
    let results = app.upload_from(&mut picker).await;
    assert_eq!(results.len(), 1);

    let id = results[0].as_ref().unwrap().id.clone();
    assert_eq!(app.files().len(), 1);
    assert_eq!(app.files().last().unwrap().display_size(), "5 Bytes");
    assert!(kv.get("files_u1").unwrap().is_some());

    assert!(app.delete_file(&id));
    assert!(app.files().is_empty());
    assert_eq!(kv.get("files_u1").unwrap().unwrap(), "[]");
}

#[tokio::test]
async fn upload_while_signed_out_reads_nothing() {
    let mut app = DocumentManager::new(
        InMemoryStore::new(),
        StaticAuthProvider::unavailable(),
        StoreConfig::default(),
    );
    let results = app
        .upload(vec![PickedFile::from_bytes("a.txt", "text/plain", b"a".to_vec())])
        .await;
    assert!(results.is_empty());
    assert!(app.files().is_empty());
}

#[tokio::test]
async fn json_file_store_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("docshelf.json");

    {
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let auth = StaticAuthProvider::new(UserProfile::new("u1"));
        let mut app = DocumentManager::new(store, auth, StoreConfig::default());
        app.sign_in().unwrap();
        app.add_document("On disk", "yes");
        app.upload(vec![PickedFile::from_bytes(
            "disk.txt",
            "text/plain",
            b"bytes".to_vec(),
        )])
        .await;
    }

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let mut app = DocumentManager::new(
        store,
        StaticAuthProvider::unavailable(),
        StoreConfig::default(),
    );
    assert!(app.start().is_workspace());
    assert_eq!(app.documents().last().unwrap().title, "On disk");

    let file = app.files().last().unwrap();
    assert_eq!(file.name, "disk.txt");
    assert_eq!(file.decode().unwrap().bytes, b"bytes");
}
