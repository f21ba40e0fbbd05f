//! Text documents: title + body, owned by the signed-in user.
//!
//! `add` and `remove` are pure and return a new collection; [`DocumentStore`]
//! loads and writes collections under the owner's key.

mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Record};
use crate::ids::{self, id_serde};

pub use store::DocumentStore;

pub type Documents = Collection<TextDocument>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    #[serde(deserialize_with = "id_serde::deserialize")]
    pub id: String,
    pub title: String,
    pub content: String,
}

impl TextDocument {
    /// Create a document with a fresh time-based id. No validation happens
    /// here; use [`try_add`] to enforce non-empty fields.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: ids::document_id(),
            title: title.into(),
            content: content.into(),
        }
    }
}

impl Record for TextDocument {
    const COLLECTION: &'static str = "documents";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && !self.title.is_empty() && !self.content.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyContent,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTitle => write!(f, "document title is empty"),
            ValidationError::EmptyContent => write!(f, "document content is empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Append a new document, or explain why it was rejected.
pub fn try_add(docs: &Documents, title: &str, content: &str) -> Result<Documents, ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(docs.appended(TextDocument::new(title, content)))
}

/// Append a new document; an empty title or content leaves `docs` unchanged.
pub fn add(docs: &Documents, title: &str, content: &str) -> Documents {
    match try_add(docs, title, content) {
        Ok(next) => next,
        Err(reason) => {
            tracing::debug!(%reason, "document rejected");
            docs.clone()
        }
    }
}

/// Drop the document with `id`; unknown ids leave `docs` unchanged.
pub fn remove(docs: &Documents, id: &str) -> Documents {
    docs.without(id)
}
