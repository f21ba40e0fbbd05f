//! Storage key layout and defaults.
//!
//! Compile-time defaults live here as constants; the binary overrides the
//! runtime pieces (`StoreConfig`) from flags and environment variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::UserId;

/// Prefix of the per-user text document key (`documents_<uid>`).
pub const DOCUMENTS_KEY_PREFIX: &str = "documents_";

/// Prefix of the per-user file key (`files_<uid>`).
pub const FILES_KEY_PREFIX: &str = "files_";

/// Single shared key used for files when [`FileScope::Global`] is selected.
pub const LEGACY_FILES_KEY: &str = "documents";

/// Key under which the signed-in profile is mirrored.
pub const SESSION_KEY: &str = "user";

/// Default data file used by the binary.
pub const DEFAULT_DATA_FILE: &str = "docshelf.json";

/// Mime type assumed when a file carries none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Whether uploaded files are stored per user or in one shared collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileScope {
    #[default]
    PerUser,
    Global,
}

impl fmt::Display for FileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileScope::PerUser => write!(f, "per-user"),
            FileScope::Global => write!(f, "global"),
        }
    }
}

impl FromStr for FileScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-user" | "user" => Ok(FileScope::PerUser),
            "global" | "shared" => Ok(FileScope::Global),
            other => Err(format!(
                "unknown file scope '{}' (expected 'per-user' or 'global')",
                other
            )),
        }
    }
}

/// Runtime key layout for the stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub documents_prefix: String,
    pub files_prefix: String,
    pub session_key: String,
    pub file_scope: FileScope,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            documents_prefix: DOCUMENTS_KEY_PREFIX.to_string(),
            files_prefix: FILES_KEY_PREFIX.to_string(),
            session_key: SESSION_KEY.to_string(),
            file_scope: FileScope::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_file_scope(mut self, scope: FileScope) -> Self {
        self.file_scope = scope;
        self
    }

    pub fn documents_key(&self, user: &UserId) -> String {
        format!("{}{}", self.documents_prefix, user)
    }

    pub fn files_key(&self, user: &UserId) -> String {
        match self.file_scope {
            FileScope::PerUser => format!("{}{}", self.files_prefix, user),
            FileScope::Global => LEGACY_FILES_KEY.to_string(),
        }
    }
}
