//! Persistent Key-Value Storage
//!
//! All client state (anonymous identifier, usage counters, session) lives in
//! one store scoped to a user profile. The store is a plain string map with
//! synchronous get/set/remove and no compare-and-swap: two processes sharing
//! a profile can lose each other's updates.

mod file;
mod memory;


pub use file::{FileStore, DEFAULT_FILE_NAME};
pub use memory::MemoryStore;

use std::sync::Arc;
use thiserror::Error;

/// Key holding the anonymous caller identifier
pub const ANONYMOUS_ID_KEY: &str = "vaakku_anonymous_id";

/// Key holding the JSON-encoded anonymous usage counters
pub const ANONYMOUS_USAGE_KEY: &str = "vaakku_anonymous_usage";

/// Key holding the bearer token of a logged-in user
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-encoded profile of a logged-in user
pub const USER_KEY: &str = "user";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Backend error
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Synchronous string key-value store scoped to one profile
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Shared handle to a store, injected into every component that needs state
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Handle RwLock poison errors consistently
pub(crate) fn handle_lock_poison<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Backend(format!("Lock poisoned: {}", e))
}
