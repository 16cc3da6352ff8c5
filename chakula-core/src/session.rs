use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Owner,
    Admin,
}

/// The user object returned by the auth service alongside the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Holds the bearer token and user object for the current session. Token
/// issuance is opaque to this client; we only store and forward it.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn store_session(&self, token: &str, user: &AuthUser) -> Result<(), StorageError> {
        self.backend.set(TOKEN_KEY, token)?;
        self.backend.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Storage failures degrade to "signed out" rather than crashing a view.
    pub fn token(&self) -> Option<String> {
        match self.backend.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(err) => {
                warn!("session token read failed: {err}");
                None
            }
        }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        let raw = match self.backend.get(USER_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("session user read failed: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("discarding corrupt session user payload: {err}");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove(TOKEN_KEY)?;
        self.backend.remove(USER_KEY)
    }
}
