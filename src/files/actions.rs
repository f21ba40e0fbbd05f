use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{FileDocument, Files};
use crate::codec::{DecodeError, DecodedFile};

/// Renders a decoded file for the user.
pub trait FileViewer {
    fn view(&mut self, name: &str, file: &DecodedFile);
}

/// Saves a decoded file under its original name.
pub trait DownloadTarget {
    fn save(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes downloads into one directory. Only the final path component of
/// the stored name is used.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadTarget for DirectoryDownloads {
    fn save(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let file_name = Path::new(name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "download".into());
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[derive(Debug)]
pub enum FileActionError {
    NotFound(String),
    Decode(DecodeError),
    Save(io::Error),
}

impl fmt::Display for FileActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileActionError::NotFound(id) => write!(f, "no file with id '{}'", id),
            FileActionError::Decode(e) => write!(f, "stored file is corrupt: {}", e),
            FileActionError::Save(e) => write!(f, "failed to save file: {}", e),
        }
    }
}

impl std::error::Error for FileActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileActionError::NotFound(_) => None,
            FileActionError::Decode(e) => Some(e),
            FileActionError::Save(e) => Some(e),
        }
    }
}

impl From<DecodeError> for FileActionError {
    fn from(err: DecodeError) -> Self {
        FileActionError::Decode(err)
    }
}

/// Look up `id` and decode its content.
pub fn open<'a>(files: &'a Files, id: &str) -> Result<(&'a FileDocument, DecodedFile), FileActionError> {
    let doc = files
        .get(id)
        .ok_or_else(|| FileActionError::NotFound(id.to_string()))?;
    let decoded = doc.decode()?;
    Ok((doc, decoded))
}

pub fn view<V: FileViewer + ?Sized>(
    files: &Files,
    id: &str,
    viewer: &mut V,
) -> Result<(), FileActionError> {
    let (doc, decoded) = open(files, id)?;
    viewer.view(&doc.name, &decoded);
    Ok(())
}

pub fn download<D: DownloadTarget + ?Sized>(
    files: &Files,
    id: &str,
    target: &D,
) -> Result<PathBuf, FileActionError> {
    let (doc, decoded) = open(files, id)?;
    target
        .save(&doc.name, &decoded.bytes)
        .map_err(FileActionError::Save)
}
