//! Integration tests for file ingestion, storage and retrieval.

mod support;

use docshelf::config::FileScope;
use docshelf::files::{self, Files};
use docshelf::{
    codec, DecodeError, DirectoryDownloads, FileActionError, FilePicker, FileStore,
    InMemoryStore, IngestError, KeyValueStore, PickedFile, StoreConfig, UserId,
};
use support::{finish, piped, FixedPicker, RecordingViewer};

fn store(scope: FileScope) -> (InMemoryStore, FileStore<InMemoryStore>) {
    let kv = InMemoryStore::new();
    let config = StoreConfig::default().with_file_scope(scope);
    (kv.clone(), FileStore::new(kv, config))
}

#[tokio::test]
async fn reads_finishing_out_of_order_are_all_kept() {
    let (_, file_store) = store(FileScope::PerUser);
    let user = UserId::new("u1");

    let (first, first_writer) = piped("first.txt", "text/plain", 5);
    let (second, second_writer) = piped("second.txt", "text/plain", 6);

    let upload = file_store.ingest_all(&user, vec![first, second]);
    let feed = async {
        // Second file completes and is stored before the first gets any bytes.
        finish(second_writer, b"second").await;
        while file_store.load(&user).len() < 1 {
            tokio::task::yield_now().await;
        }
        finish(first_writer, b"first").await;
    };
    let (results, ()) = tokio::join!(upload, feed);

    let names: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().name)
        .collect();
    assert_eq!(names, vec!["first.txt", "second.txt"]);

    let stored = file_store.load(&user);
    let stored_names: Vec<&str> = stored.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(stored_names, vec!["second.txt", "first.txt"]);
}

#[tokio::test]
async fn large_concurrent_batch_loses_nothing() {
    let (_, file_store) = store(FileScope::PerUser);
    let user = UserId::new("u1");

    let picked: Vec<PickedFile> = (0..20)
        .map(|i| {
            PickedFile::from_bytes(
                format!("file-{i}.bin"),
                "application/octet-stream",
                vec![i as u8; 100 + i],
            )
        })
        .collect();

    let results = file_store.ingest_all(&user, picked).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let stored = file_store.load(&user);
    assert_eq!(stored.len(), 20);
    for i in 0..20 {
        assert!(stored.iter().any(|f| f.name == format!("file-{i}.bin")));
    }
}

#[tokio::test]
async fn stored_content_decodes_to_original_bytes() {
    let (_, file_store) = store(FileScope::PerUser);
    let user = UserId::new("u1");
    let bytes: Vec<u8> = (0..=255).collect();

    let doc = file_store
        .ingest(
            &user,
            PickedFile::from_bytes("all.bin", "application/octet-stream", bytes.clone()),
        )
        .await
        .unwrap();

    assert_eq!(doc.size_bytes, 256);
    assert!(doc.content.starts_with("data:application/octet-stream;base64,"));

    let decoded = doc.decode().unwrap();
    assert_eq!(decoded.mime_type, "application/octet-stream");
    assert_eq!(decoded.bytes, bytes);
}

#[tokio::test]
async fn short_read_is_reported_and_not_stored() {
    let (_, file_store) = store(FileScope::PerUser);
    let user = UserId::new("u1");

    let (picked, writer) = piped("truncated.txt", "text/plain", 10);
    let (result, ()) = tokio::join!(file_store.ingest(&user, picked), finish(writer, b"abc"));

    match result.unwrap_err() {
        IngestError::SizeMismatch {
            name,
            declared,
            actual,
        } => {
            assert_eq!(name, "truncated.txt");
            assert_eq!(declared, 10);
            assert_eq!(actual, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(file_store.load(&user).is_empty());
}

#[tokio::test]
async fn one_failure_does_not_block_the_rest() {
    let (_, file_store) = store(FileScope::PerUser);
    let user = UserId::new("u1");

    let mut picker = FixedPicker(vec![
        PickedFile::from_bytes("ok.txt", "text/plain", b"fine".to_vec()),
        PickedFile::new("bad.txt", "text/plain", 99, std::io::Cursor::new(b"x".to_vec())),
    ]);

    let results = file_store.ingest_all(&user, picker.pick()).await;
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(file_store.load(&user).len(), 1);
    assert!(picker.pick().is_empty());
}

#[test]
fn delete_then_load_never_returns_the_id() {
    let (_, file_store) = store(FileScope::PerUser);
    let user = UserId::new("u1");

    let a = files::FileDocument::from_bytes("a.txt", "text/plain", b"a");
    let b = files::FileDocument::from_bytes("b.txt", "text/plain", b"b");
    file_store.append(&user, a.clone()).unwrap();
    file_store.append(&user, b.clone()).unwrap();

    file_store.delete(&user, &a.id).unwrap();
    let stored = file_store.load(&user);
    assert!(!stored.contains(&a.id));
    assert!(stored.contains(&b.id));
}

#[test]
fn global_scope_reads_legacy_layout() {
    let (kv, file_store) = store(FileScope::Global);
    kv.set(
        "documents",
        r#"[{"id":1700000000000.5,"name":"old.txt","type":"text/plain","size":2,
             "content":"data:text/plain;base64,aGk=","uploadDate":"1/2/2024, 10:00:00 AM"}]"#,
    )
    .unwrap();

    let stored: Files = file_store.load(&UserId::new("anyone"));
    assert_eq!(stored.len(), 1);
    let doc = stored.last().unwrap();
    assert_eq!(doc.id, "1700000000000.5");
    assert_eq!(doc.mime_type, "text/plain");
    assert_eq!(doc.size_bytes, 2);
    assert_eq!(doc.decode().unwrap().bytes, b"hi");
}

#[test]
fn malformed_file_collection_loads_empty() {
    let (kv, file_store) = store(FileScope::PerUser);
    kv.set("files_u1", "[{\"broken\":").unwrap();
    assert!(file_store.load(&UserId::new("u1")).is_empty());
}

#[test]
fn view_hands_decoded_bytes_to_viewer() {
    let doc = files::FileDocument::from_bytes("notes.txt", "text/plain", b"hello");
    let id = doc.id.clone();
    let stored: Files = vec![doc].into();

    let mut viewer = RecordingViewer::default();
    files::view(&stored, &id, &mut viewer).unwrap();
    assert_eq!(
        viewer.seen,
        vec![(
            "notes.txt".to_string(),
            "text/plain".to_string(),
            b"hello".to_vec()
        )]
    );
}

#[test]
fn download_saves_under_original_name() {
    let dir = tempfile::tempdir().unwrap();
    let doc = files::FileDocument::from_bytes("report.csv", "text/csv", b"a,b\n1,2\n");
    let id = doc.id.clone();
    let stored: Files = vec![doc].into();

    let path = files::download(&stored, &id, &DirectoryDownloads::new(dir.path())).unwrap();
    assert_eq!(path.file_name().unwrap(), "report.csv");
    assert_eq!(std::fs::read(path).unwrap(), b"a,b\n1,2\n");
}

#[test]
fn tampered_content_fails_to_decode() {
    let mut doc = files::FileDocument::from_bytes("a.txt", "text/plain", b"abc");
    doc.content = codec::encode("text/plain", b"abcdef");
    let id = doc.id.clone();
    let stored: Files = vec![doc].into();

    let err = files::view(&stored, &id, &mut RecordingViewer::default()).unwrap_err();
    assert!(matches!(
        err,
        FileActionError::Decode(DecodeError::SizeMismatch {
            expected: 3,
            actual: 6
        })
    ));
}
