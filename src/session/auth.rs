use std::fmt;

use super::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider refused or the user cancelled.
    Rejected(String),
    /// The provider could not be reached or is not configured.
    Unavailable(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Rejected(reason) => write!(f, "sign-in rejected: {}", reason),
            AuthError::Unavailable(reason) => write!(f, "identity provider unavailable: {}", reason),
        }
    }
}

impl std::error::Error for AuthError {}

/// Third-party identity provider.
pub trait AuthProvider {
    fn sign_in(&mut self) -> Result<UserProfile, AuthError>;

    fn sign_out(&mut self) -> Result<(), AuthError>;

    /// A session the provider itself still holds, if any.
    fn current_user(&self) -> Option<UserProfile> {
        None
    }
}

/// Provider with a fixed outcome, for the command line and tests.
#[derive(Debug, Clone)]
pub struct StaticAuthProvider {
    outcome: Result<UserProfile, AuthError>,
    signed_in: bool,
}

impl StaticAuthProvider {
    /// Every sign-in succeeds with `profile`.
    pub fn new(profile: UserProfile) -> Self {
        Self {
            outcome: Ok(profile),
            signed_in: false,
        }
    }

    /// Every sign-in fails with `error`.
    pub fn failing(error: AuthError) -> Self {
        Self {
            outcome: Err(error),
            signed_in: false,
        }
    }

    /// No identity configured; sign-in reports the provider as unavailable.
    pub fn unavailable() -> Self {
        Self::failing(AuthError::Unavailable("no identity configured".into()))
    }
}

impl AuthProvider for StaticAuthProvider {
    fn sign_in(&mut self) -> Result<UserProfile, AuthError> {
        let profile = self.outcome.clone()?;
        self.signed_in = true;
        Ok(profile)
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        self.signed_in = false;
        Ok(())
    }

    fn current_user(&self) -> Option<UserProfile> {
        match (&self.outcome, self.signed_in) {
            (Ok(profile), true) => Some(profile.clone()),
            _ => None,
        }
    }
}
