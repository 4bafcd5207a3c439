//! Error types for vaakku-core
//!
//! This module provides the crate error type and the trait used to turn any
//! error into a message a person can act on.

use crate::storage::StorageError;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Profile storage failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored or received JSON could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input rejected before any network call
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for user-friendly error messages
///
/// Implemented by every error that ends up in front of a person.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get a suggestion for how to fix the error
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Storage(e) => format!("Could not access local profile data: {}", e),
            Error::Serialization(_) => "Local profile data is unreadable.".to_string(),
            Error::InvalidInput(msg) => msg.clone(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Storage(_) => {
                Some("Check that the profile directory is writable.".to_string())
            }
            Error::Serialization(_) => Some("Log in again to refresh your session.".to_string()),
            Error::InvalidInput(_) => None,
        }
    }
}
