//! Session domain models.

use serde::{Deserialize, Serialize};

/// The authenticated account behind a session.
///
/// `username` is mutable via profile edit; `email` is fixed at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Whether the current user is logged in, and who they are.
///
/// At most one user at a time. Replaced wholesale on login, cleared on
/// logout or on hydration failure. The corresponding bearer token lives in
/// the [`TokenStore`](super::TokenStore), not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        self.user = None;
    }
}

/// How session hydration at startup concluded.
///
/// Hydration never fails with an error: an expired session must degrade to
/// anonymous browsing, not block app start. The variants keep the three
/// failure shapes apart so each can be asserted on independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// No token was persisted; no network call was made.
    NoToken,
    /// The stored token was accepted and the user is logged in again.
    Restored,
    /// The server rejected the stored token; it has been purged.
    InvalidToken,
    /// The server could not be reached; the token has been purged.
    Unreachable,
    /// The session changed while the profile fetch was in flight; the
    /// result was discarded without touching state.
    Superseded,
}

/// Effect the caller must apply after a logout.
///
/// Logout is a hard reset to the home screen: nothing on screen may keep
/// referencing the old user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutEffect {
    NavigateHome,
}
