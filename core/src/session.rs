//! Session persistence: the bearer token and user profile of the
//! authenticated actor.
//!
//! Token and user are always written and cleared together. A reader treats
//! a malformed stored profile as "no session" rather than an error.

use std::fmt;
use std::sync::Arc;

use crate::storage::{Storage, AUTH_TOKEN_KEY, USER_KEY};
use crate::types::{Session, User};

/// Persists and retrieves the current `Session` in durable storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Write token and user together. A session with an empty token is never
    /// persisted — this guards against committing partial state from a
    /// malformed authentication response.
    pub fn save(&self, session: &Session) {
        if session.token.is_empty() {
            return;
        }
        let Ok(user_json) = serde_json::to_string(&session.user) else {
            return;
        };
        self.storage.set(AUTH_TOKEN_KEY, &session.token);
        self.storage.set(USER_KEY, &user_json);
    }

    /// The stored user profile, or `None` when absent or unparseable.
    pub fn current(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// The stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Remove both token and user.
    pub fn clear(&self) {
        self.storage.remove(AUTH_TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    /// Empty when no token is stored, else a single
    /// `authorization: Bearer <token>` pair.
    pub fn auth_header(&self) -> Vec<(String, String)> {
        match self.token() {
            Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
