use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthProvider, UserId, UserProfile};
use crate::storage::KeyValueStore;

const AUTH_STATE_CHANGED: &str = "auth_state_changed";

/// Payload delivered to auth-state subscribers. `user` is `None` on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStateChange {
    pub user: Option<UserProfile>,
}

/// Holds the signed-in profile and fans out changes to subscribers.
pub struct SessionStore<S> {
    store: S,
    key: String,
    user: Option<UserProfile>,
    emitter: EventEmitter,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            user: None,
            emitter: EventEmitter::new(),
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.uid)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Register `callback` for every sign-in state change. Returns an id
    /// for [`SessionStore::unsubscribe`].
    pub fn on_auth_state_change<F>(&mut self, callback: F) -> String
    where
        F: Fn(AuthStateChange) + Send + Sync + 'static,
    {
        self.emitter.on(AUTH_STATE_CHANGED, callback)
    }

    pub fn unsubscribe(&mut self, listener_id: &str) -> bool {
        self.emitter.remove_listener(listener_id).is_some()
    }

    /// Restore the profile mirrored by a previous run. A malformed mirror
    /// is dropped and the session stays signed out.
    pub fn restore(&mut self) -> Option<&UserProfile> {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read stored session");
                return None;
            }
        };

        match serde_json::from_str::<UserProfile>(&text) {
            Ok(profile) => {
                tracing::info!(uid = %profile.uid, "restored session");
                self.set_user(Some(profile));
                self.user.as_ref()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding malformed stored session");
                None
            }
        }
    }

    /// Sign in through `auth`. On failure the session is left as it was.
    pub fn sign_in<A: AuthProvider>(&mut self, auth: &mut A) -> Result<UserProfile, AuthError> {
        let profile = auth.sign_in().inspect_err(|e| {
            tracing::error!(error = %e, "sign-in failed");
        })?;
        tracing::info!(uid = %profile.uid, "signed in");
        self.set_user(Some(profile.clone()));
        Ok(profile)
    }

    /// Sign out through `auth`; the local session is cleared even if the
    /// provider reports an error.
    pub fn sign_out<A: AuthProvider>(&mut self, auth: &mut A) -> Result<(), AuthError> {
        let result = auth.sign_out();
        if let Err(e) = &result {
            tracing::error!(error = %e, "provider sign-out failed");
        }
        if let Some(user) = &self.user {
            tracing::info!(uid = %user.uid, "signed out");
        }
        self.set_user(None);
        result
    }

    /// Replace the current profile, mirror it to storage and notify.
    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.mirror(user.as_ref());
        self.user = user.clone();

        for handle in self.emitter.emit(AUTH_STATE_CHANGED, AuthStateChange { user }) {
            if handle.join().is_err() {
                tracing::error!("auth state listener panicked");
            }
        }
    }

    fn mirror(&self, user: Option<&UserProfile>) {
        let result = match user {
            Some(profile) => match serde_json::to_string(profile) {
                Ok(text) => self.store.set(&self.key, &text),
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize session");
                    return;
                }
            },
            None => self.store.remove(&self.key),
        };

        if let Err(e) = result {
            tracing::error!(key = %self.key, error = %e, "failed to persist session");
        }
    }
}
