//! Vaakku Core - Caller Identity & Anonymous Entitlements
//!
//! This crate holds the client-side state of the Vaakku speech client:
//! - Storage: a per-profile key-value store (file-backed or in-memory)
//! - Identity: authenticated vs anonymous caller resolution
//! - Entitlement: free-tier usage counters for TTS, STT and translation
//! - Session: bearer token and cached user profile
//! - Catalogs: metered features, languages, password policy
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use vaakku_core::{EntitlementTracker, Feature, MemoryStore, SharedStore};
//!
//! let store: SharedStore = Arc::new(MemoryStore::new());
//! let tracker = EntitlementTracker::new(store);
//!
//! assert_eq!(tracker.remaining(Feature::Tts), 3);
//! tracker.record_attempt(Feature::Tts);
//! assert_eq!(tracker.remaining(Feature::Tts), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod entitlement;
pub mod error;
pub mod feature;
pub mod identity;
pub mod languages;
pub mod password;
pub mod secure_string;
pub mod session;
pub mod storage;

pub use entitlement::{EntitlementTracker, QuotaState, UsageCounters};
pub use error::{Error, Result, UserFriendlyError};
pub use feature::{Feature, FeatureLimits, InputLimits, ANONYMOUS_LIMITS};
pub use identity::{CallerIdentity, IdentityResolver};
pub use secure_string::SecureString;
pub use session::{SessionStore, UserProfile, LOGIN_ROUTE};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError};

/// Get the default profile directory (`~/.vaakku`)
#[must_use]
pub fn default_profile_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".vaakku")
}
