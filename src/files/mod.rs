//! Uploaded files: binary content kept as data-URL text plus metadata.
//!
//! Files arrive as [`PickedFile`]s, are read asynchronously, encoded with
//! [`crate::codec`] and appended to the owner's collection by [`FileStore`].
//! Stored files are handed back out through a [`FileViewer`] or a
//! [`DownloadTarget`].

mod actions;
mod picked;
mod store;

use serde::{Deserialize, Serialize};

use crate::codec::{self, DecodeError, DecodedFile};
use crate::collection::{Collection, Record};
use crate::format::format_size;
use crate::ids::{self, id_serde};

pub use actions::{
    download, open, view, DirectoryDownloads, DownloadTarget, FileActionError, FileViewer,
};
pub use picked::{guess_mime_type, FilePicker, PickedFile};
pub use store::{FileStore, IngestError};

pub type Files = Collection<FileDocument>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDocument {
    #[serde(deserialize_with = "id_serde::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(alias = "type")]
    pub mime_type: String,
    #[serde(alias = "size")]
    pub size_bytes: u64,
    /// `data:<mime>;base64,<payload>`
    pub content: String,
    #[serde(alias = "uploadDate")]
    pub upload_timestamp: String,
}

impl FileDocument {
    /// Build a document for freshly read bytes, stamped with the local time.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        Self {
            id: ids::file_id(),
            name: name.into(),
            content: codec::encode(&mime_type, bytes),
            mime_type,
            size_bytes: bytes.len() as u64,
            upload_timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Recover the original bytes, checking them against `size_bytes`.
    pub fn decode(&self) -> Result<DecodedFile, DecodeError> {
        let decoded = codec::decode(&self.content)?;
        if decoded.bytes.len() as u64 != self.size_bytes {
            return Err(DecodeError::SizeMismatch {
                expected: self.size_bytes,
                actual: decoded.bytes.len() as u64,
            });
        }
        Ok(decoded)
    }

    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

impl Record for FileDocument {
    const COLLECTION: &'static str = "files";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Drop the file with `id`; unknown ids leave `files` unchanged.
pub fn remove(files: &Files, id: &str) -> Files {
    files.without(id)
}
