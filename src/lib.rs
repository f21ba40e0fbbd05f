pub mod app;
pub mod codec;
pub mod collection;
pub mod config;
pub mod document;
pub mod files;
pub mod format;
pub mod ids;
pub mod queue;
pub mod session;
pub mod storage;
pub mod view;

pub use app::DocumentManager;
pub use codec::{DecodeError, DecodedFile};
pub use collection::{Collection, CollectionRepository, Record};
pub use config::{FileScope, StoreConfig};
pub use document::{DocumentStore, Documents, TextDocument, ValidationError};
pub use files::{
    DirectoryDownloads, DownloadTarget, FileActionError, FileDocument, FilePicker, FileStore,
    FileViewer, Files, IngestError, PickedFile,
};
pub use format::format_size;
pub use queue::KeyedQueue;
pub use session::{
    AuthError, AuthProvider, AuthStateChange, SessionStore, StaticAuthProvider, UserId,
    UserProfile,
};
pub use storage::{InMemoryStore, JsonFileStore, KeyValueStore, StorageError};
pub use view::{Tab, ViewController, ViewEvent, ViewState};
