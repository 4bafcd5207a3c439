//! Error types for vaakku-client

use thiserror::Error;
use vaakku_core::UserFriendlyError;

/// Client error type for non-metered calls and transport failures
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS, TLS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// Client misconfiguration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input rejected before sending
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Server answered with an error
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status
        status: u16,
        /// Server-provided or fallback message
        message: String,
    },

    /// The current user may not make this call; nothing was sent
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Server rejected the session; it has been cleared locally
    #[error("session expired")]
    SessionExpired,

    /// Server answered with a body this client cannot read
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Local state error
    #[error("core error: {0}")]
    Core(#[from] vaakku_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Network(_) => "Could not reach the Vaakku server.".to_string(),
            Error::Configuration(msg) => format!("Configuration error: {}", msg),
            Error::InvalidInput(msg) => msg.clone(),
            Error::Api { message, .. } => message.clone(),
            Error::Forbidden(msg) => msg.clone(),
            Error::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            Error::InvalidResponse(_) => "The server sent an unexpected response.".to_string(),
            Error::Core(e) => e.user_message(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Network(_) => {
                Some("Check your connection and the VAAKKU_API_URL setting.".to_string())
            }
            Error::Configuration(_) => Some("Review config/local.toml or VAAKKU_* variables.".to_string()),
            Error::SessionExpired => Some("Run `vaakku login`.".to_string()),
            Error::Core(e) => e.suggestion(),
            Error::InvalidInput(_)
            | Error::Api { .. }
            | Error::Forbidden(_)
            | Error::InvalidResponse(_) => None,
        }
    }
}
