use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::IngestError;
use crate::config::DEFAULT_MIME_TYPE;

/// Source of files chosen by the user.
pub trait FilePicker {
    fn pick(&mut self) -> Vec<PickedFile>;
}

/// A file chosen for upload whose bytes have not been read yet.
pub struct PickedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl fmt::Debug for PickedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

impl PickedFile {
    pub fn new<R>(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        reader: R,
    ) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            reader: Box::new(reader),
        }
    }

    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, mime_type, size, io::Cursor::new(bytes))
    }

    /// Open a file on disk. Size comes from its metadata and the mime type
    /// is guessed from the extension.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let size = file.metadata()?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = guess_mime_type(&name);

        Ok(Self::new(name, mime_type, size, tokio::fs::File::from_std(file)))
    }

    /// Read every byte. A short or long read against `size_bytes` is an error.
    pub(crate) async fn read_all(mut self) -> Result<(String, String, Vec<u8>), IngestError> {
        let mut bytes = Vec::with_capacity(self.size_bytes.min(1 << 20) as usize);
        self.reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|source| IngestError::Read {
                name: self.name.clone(),
                source,
            })?;

        if bytes.len() as u64 != self.size_bytes {
            return Err(IngestError::SizeMismatch {
                name: self.name,
                declared: self.size_bytes,
                actual: bytes.len() as u64,
            });
        }

        Ok((self.name, self.mime_type, bytes))
    }
}

/// Mime type for common extensions, `application/octet-stream` otherwise.
pub fn guess_mime_type(name: &str) -> &'static str {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return DEFAULT_MIME_TYPE,
    };

    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => DEFAULT_MIME_TYPE,
    }
}
