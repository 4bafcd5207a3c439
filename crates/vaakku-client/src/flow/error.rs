//! Failures of a metered request
//!
//! Everything the request flow can report back. None of these are fatal;
//! each one converts to a single message for the user.

use thiserror::Error;
use vaakku_core::{Feature, UserFriendlyError};

/// Failure of a metered feature call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Anonymous quota already used up; nothing was sent
    #[error("{feature} quota exhausted")]
    LocalQuotaExceeded {
        /// Feature refused
        feature: Feature,
    },

    /// The server reported the anonymous quota as used up
    #[error("{feature} quota exhausted (server): {message}")]
    ServerQuotaExceeded {
        /// Feature refused
        feature: Feature,
        /// Server message
        message: String,
    },

    /// The call failed for any other reason; quota state is unchanged
    #[error("{feature} request failed: {message}")]
    TransientRequestFailure {
        /// Feature attempted
        feature: Feature,
        /// HTTP status, absent for connection failures
        status: Option<u16>,
        /// Server message or fallback
        message: String,
    },

    /// The server rejected the session; it has been cleared locally
    #[error("session invalidated")]
    SessionInvalidated {
        /// Where the user should go to log in again
        redirect_to: &'static str,
    },

    /// Nothing to send after trimming; nothing was sent
    #[error("{feature} input is empty")]
    EmptyInput {
        /// Feature attempted
        feature: Feature,
    },
}

/// Result type for metered calls
pub type FlowResult<T> = std::result::Result<T, FlowError>;

/// Machine-readable reason of a [`FlowError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Anonymous quota used up, locally or per the server
    QuotaExhausted,
    /// Anything retryable
    Transient,
    /// Session ended; log in again
    SessionExpired,
    /// Input refused before sending
    InvalidInput,
}

impl FailureKind {
    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::QuotaExhausted => "exhausted",
            FailureKind::Transient => "transient",
            FailureKind::SessionExpired => "session_expired",
            FailureKind::InvalidInput => "invalid_input",
        }
    }
}

impl FlowError {
    /// Reason category
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            FlowError::LocalQuotaExceeded { .. } | FlowError::ServerQuotaExceeded { .. } => {
                FailureKind::QuotaExhausted
            }
            FlowError::TransientRequestFailure { .. } => FailureKind::Transient,
            FlowError::SessionInvalidated { .. } => FailureKind::SessionExpired,
            FlowError::EmptyInput { .. } => FailureKind::InvalidInput,
        }
    }

    /// `true` for either quota case
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        self.kind() == FailureKind::QuotaExhausted
    }

    /// Feature the failure belongs to; `None` for session invalidation
    #[must_use]
    pub fn feature(&self) -> Option<Feature> {
        match self {
            FlowError::LocalQuotaExceeded { feature }
            | FlowError::ServerQuotaExceeded { feature, .. }
            | FlowError::TransientRequestFailure { feature, .. }
            | FlowError::EmptyInput { feature } => Some(*feature),
            FlowError::SessionInvalidated { .. } => None,
        }
    }
}

/// Generic failure message for a feature
#[must_use]
pub fn fallback_message(feature: Feature) -> &'static str {
    match feature {
        Feature::Tts => "TTS failed",
        Feature::Stt => "STT failed",
        Feature::Translate => "Translation failed",
    }
}

/// Message shown when a feature's free tries are used up
#[must_use]
pub fn exhausted_message(feature: Feature) -> String {
    format!(
        "You've used all {} free {} tries.",
        feature.anonymous_limit(),
        feature.label()
    )
}

impl UserFriendlyError for FlowError {
    fn user_message(&self) -> String {
        match self {
            // Same wording whichever side noticed first
            FlowError::LocalQuotaExceeded { feature }
            | FlowError::ServerQuotaExceeded { feature, .. } => exhausted_message(*feature),
            FlowError::TransientRequestFailure { message, .. } => message.clone(),
            FlowError::SessionInvalidated { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            FlowError::EmptyInput { feature } => match feature {
                Feature::Stt => "Please select an audio file.".to_string(),
                _ => "Please enter some text.".to_string(),
            },
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            FlowError::LocalQuotaExceeded { .. } | FlowError::ServerQuotaExceeded { .. } => {
                Some("Sign up for more: run `vaakku signup`.".to_string())
            }
            FlowError::SessionInvalidated { .. } => Some("Run `vaakku login`.".to_string()),
            FlowError::TransientRequestFailure { status: None, .. } => {
                Some("Check your connection and try again.".to_string())
            }
            FlowError::TransientRequestFailure { .. } | FlowError::EmptyInput { .. } => None,
        }
    }
}
