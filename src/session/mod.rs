//! Client-side authentication state.
//!
//! [`Session`] is the in-memory slice with its three transitions, [`SessionStore`]
//! persists the bearer token and a mirror of the slice, and [`AppContext`] ties
//! both to the API client and is handed explicitly to every handler.

mod context;
mod store;

use serde::{Deserialize, Serialize};

use crate::models::User;

pub use context::AppContext;
pub use store::SessionStore;

/// Who the client believes is signed in.
///
/// `is_authenticated` is true exactly when `token` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Login, registration or bootstrap success.
    pub fn set_user(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
    }

    /// Rehydrate from persisted state. A missing or empty token leaves the session untouched.
    pub fn restore_session(&mut self, user: Option<User>, token: Option<String>) {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return;
        };
        self.user = Some(user.unwrap_or_default());
        self.token = Some(token);
        self.is_authenticated = true;
    }

    /// Replace the user record while keeping the current token.
    ///
    /// Returns `false` (and changes nothing) when nobody is signed in.
    pub fn refresh_user(&mut self, user: User) -> bool {
        if !self.is_authenticated {
            return false;
        }
        self.user = Some(user);
        true
    }

    pub fn log_out(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
    }
}
