//! Session - who is signed in, and who wants to know when that changes.
//!
//! Sign-in itself is delegated to an [`AuthProvider`]; the crate only consumes
//! the resulting [`UserProfile`]. [`SessionStore`] keeps the current profile,
//! mirrors it into storage so a later start can restore it, and notifies
//! subscribers on every change.

mod auth;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use auth::{AuthError, AuthProvider, StaticAuthProvider};
pub use store::{AuthStateChange, SessionStore};

/// Identifier of a signed-in user, used to namespace storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Profile returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: UserId,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

impl UserProfile {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: UserId::new(uid),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Display name, falling back to email, then uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(self.uid.as_str())
    }
}
