//! Integration tests for text documents and their per-user storage.

use docshelf::document::{self, Documents};
use docshelf::{
    DocumentStore, InMemoryStore, KeyValueStore, StoreConfig, TextDocument, UserId,
    ValidationError,
};

fn store() -> (InMemoryStore, DocumentStore<InMemoryStore>) {
    let kv = InMemoryStore::new();
    (kv.clone(), DocumentStore::new(kv, StoreConfig::default()))
}

#[test]
fn note_added_to_empty_collection_round_trips() {
    let (kv, docs_store) = store();
    let user = UserId::new("u1");

    let docs = document::add(&Documents::new(), "Note", "Hello");
    assert_eq!(docs.len(), 1);
    let note = docs.last().unwrap();
    assert_eq!(note.title, "Note");
    assert_eq!(note.content, "Hello");
    assert!(!note.id.is_empty());

    docs_store.persist(Some(&user), &docs).unwrap();

    let text = kv.get("documents_u1").unwrap().unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw[0]["title"], "Note");
    assert_eq!(raw[0]["content"], "Hello");

    assert_eq!(docs_store.load(&user), docs);
}

#[test]
fn valid_adds_grow_by_one_and_land_last() {
    let mut docs = Documents::new();
    for (i, (title, content)) in [("a", "1"), ("b", "2"), ("c", "3")].into_iter().enumerate() {
        docs = document::add(&docs, title, content);
        assert_eq!(docs.len(), i + 1);
        assert_eq!(docs.last().unwrap().title, title);
    }

    let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids[0] != ids[1] && ids[1] != ids[2] && ids[0] != ids[2]);
}

#[test]
fn empty_title_or_content_is_rejected() {
    let docs = document::add(&Documents::new(), "Keep", "me");

    assert_eq!(document::add(&docs, "", "body"), docs);
    assert_eq!(document::add(&docs, "title", ""), docs);
    assert_eq!(
        document::try_add(&docs, "", "").unwrap_err(),
        ValidationError::EmptyTitle
    );
    assert_eq!(
        document::try_add(&docs, "t", "").unwrap_err(),
        ValidationError::EmptyContent
    );
}

#[test]
fn removed_id_never_comes_back_from_storage() {
    let (_, docs_store) = store();
    let user = UserId::new("u1");

    let docs = document::add(&Documents::new(), "a", "1");
    let docs = document::add(&docs, "b", "2");
    let doomed = docs.iter().next().unwrap().id.clone();

    let docs = document::remove(&docs, &doomed);
    docs_store.persist(Some(&user), &docs).unwrap();

    let loaded = docs_store.load(&user);
    assert_eq!(loaded.len(), 1);
    assert!(!loaded.contains(&doomed));
}

#[test]
fn removing_unknown_id_is_noop() {
    let docs = document::add(&Documents::new(), "a", "1");
    assert_eq!(document::remove(&docs, "no-such-id"), docs);
}

#[test]
fn corrupt_storage_loads_empty() {
    let (kv, docs_store) = store();
    let user = UserId::new("u1");

    kv.set("documents_u1", "not json at all").unwrap();
    assert!(docs_store.load(&user).is_empty());

    kv.set("documents_u1", r#"{"id":"1","title":"t","content":"c"}"#)
        .unwrap();
    assert!(docs_store.load(&user).is_empty());
}

#[test]
fn one_malformed_entry_empties_the_collection() {
    let (kv, docs_store) = store();
    let user = UserId::new("u1");

    kv.set(
        "documents_u1",
        r#"[{"id":"1","title":"ok","content":"fine"},{"id":"2","title":"","content":"x"}]"#,
    )
    .unwrap();
    assert!(docs_store.load(&user).is_empty());
}

#[test]
fn numeric_ids_from_older_data_are_accepted() {
    let (kv, docs_store) = store();
    let user = UserId::new("u1");

    kv.set(
        "documents_u1",
        r#"[{"id":1700000000000,"title":"old","content":"note"}]"#,
    )
    .unwrap();

    let loaded = docs_store.load(&user);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.last().unwrap().id, "1700000000000");
}

#[test]
fn persist_without_user_writes_nothing() {
    let (kv, docs_store) = store();
    let docs = document::add(&Documents::new(), "a", "1");

    docs_store.persist(None, &docs).unwrap();
    assert!(kv.is_empty());
}

#[test]
fn switching_users_switches_collections() {
    let (_, docs_store) = store();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    docs_store
        .persist(Some(&alice), &vec![TextDocument::new("mine", "alice")].into())
        .unwrap();

    assert_eq!(docs_store.load(&alice).len(), 1);
    assert!(docs_store.load(&bob).is_empty());
}
