//! Session Store
//!
//! The bearer token and the cached profile of a logged-in user. The token's
//! presence is the only thing that makes a caller "authenticated".

use crate::error::Result;
use crate::secure_string::SecureString;
use crate::storage::{SharedStore, TOKEN_KEY, USER_KEY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};


/// Entry point a caller is sent to after the session is invalidated
pub const LOGIN_ROUTE: &str = "/login";

/// Profile of a logged-in user, as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server-side user id
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Login email
    #[serde(default)]
    pub email: String,
    /// Remaining server-side credits, if the server reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
    /// Whether the user stored a personal provider API key
    #[serde(default)]
    pub has_sarvam_key: bool,
    /// Whether the user may view admin statistics
    #[serde(default)]
    pub is_admin: bool,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads and writes session state in the profile store
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    /// Create a session view over a profile store
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Current bearer token; blank tokens count as absent
    pub fn token(&self) -> Result<Option<SecureString>> {
        let token = self
            .store
            .get(TOKEN_KEY)?
            .map(SecureString::new)
            .filter(|t| !t.is_blank());
        Ok(token)
    }

    /// `true` if a usable token is stored; unreadable storage counts as logged out
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Store a freshly issued token together with the user's profile
    pub fn set_session(&self, token: &SecureString, user: &UserProfile) -> Result<()> {
        self.store.set(TOKEN_KEY, token.expose())?;
        self.set_user(user)?;
        info!(email = %user.email, "Session stored");
        Ok(())
    }

    /// Cached profile; corrupt data reads as `None`
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        let raw = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read cached profile");
                return None;
            }
        };

        match serde_json::from_str::<Option<UserProfile>>(&raw) {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "Cached profile is unreadable, ignoring");
                None
            }
        }
    }

    /// Replace the cached profile
    pub fn set_user(&self, user: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &json)?;
        Ok(())
    }

    /// Drop the cached profile but keep the token
    pub fn clear_user(&self) -> Result<()> {
        self.store.remove(USER_KEY)?;
        Ok(())
    }

    /// Destroy the session (token and profile)
    pub fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        info!("Session cleared");
        Ok(())
    }
}
