//! Collections - ordered records persisted as JSON-array text under one key.
//!
//! A [`Collection`] is a value: every mutation returns a new collection and
//! leaves the original untouched, so the caller decides when (and whether)
//! the result is written back through a [`CollectionRepository`].
//!
//! ## Example
//!
//! ```
//! use docshelf::{Collection, CollectionRepository, InMemoryStore, TextDocument};
//!
//! let store = InMemoryStore::new();
//! let repo = CollectionRepository::<_, TextDocument>::new(&store);
//!
//! let docs = Collection::new().appended(TextDocument::new("Note", "Hello"));
//! repo.persist("documents_u1", &docs).unwrap();
//! assert_eq!(repo.load("documents_u1"), docs);
//! ```

mod repository;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use repository::CollectionRepository;

/// Trait for types that can be stored in a collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Name used in diagnostics (e.g., "documents", "files").
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this record.
    fn id(&self) -> &str;

    /// Shape check applied to every record on load. A single failing record
    /// discards the whole stored collection.
    fn is_well_formed(&self) -> bool {
        !self.id().is_empty()
    }
}

/// Insertion-ordered, immutable-update list of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Record> Collection<T> {
    /// A new collection with `record` at the end.
    pub fn appended(&self, record: T) -> Self {
        let mut items = self.items.clone();
        items.push(record);
        Self { items }
    }

    /// A new collection without the record whose id is `id`. Unknown ids
    /// yield an equal collection.
    pub fn without(&self, id: &str) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|r| r.id() != id)
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
