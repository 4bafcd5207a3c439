//! Metered Features
//!
//! The three capabilities the service meters, with the free-tier allowances
//! given to anonymous callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

// ============================================================================
// Feature
// ============================================================================

/// A metered capability with its own independent quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Text-to-speech
    Tts,
    /// Speech-to-text
    Stt,
    /// Text translation
    Translate,
}

impl Feature {
    /// Every metered feature
    pub const ALL: [Feature; 3] = [Feature::Tts, Feature::Stt, Feature::Translate];

    /// Wire and storage name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Feature::Tts => "tts",
            Feature::Stt => "stt",
            Feature::Translate => "translate",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Feature::Tts => "Text to Speech",
            Feature::Stt => "Speech to Text",
            Feature::Translate => "Translation",
        }
    }

    /// Free attempts granted to an anonymous caller
    #[must_use]
    pub const fn anonymous_limit(self) -> u32 {
        ANONYMOUS_LIMITS.get(self)
    }

    /// Maximum input length in characters, `None` for audio input
    #[must_use]
    pub const fn max_input_chars(self, anonymous: bool) -> Option<usize> {
        let limits = if anonymous {
            ANONYMOUS_MAX_CHARS
        } else {
            AUTHENTICATED_MAX_CHARS
        };
        limits.get(self)
    }

    /// Trim text input and cut it to the caller's character limit
    ///
    /// Returns `None` when nothing is left after trimming.
    #[must_use]
    pub fn prepare_text(self, text: &str, anonymous: bool) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match self.max_input_chars(anonymous) {
            Some(max) => Some(truncate_chars(trimmed, max).to_string()),
            None => Some(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tts" => Ok(Feature::Tts),
            "stt" => Ok(Feature::Stt),
            "translate" => Ok(Feature::Translate),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown feature '{}' (expected tts, stt or translate)",
                other
            ))),
        }
    }
}

/// Cut `s` to at most `max` characters on a char boundary
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ============================================================================
// Limits
// ============================================================================

/// Per-feature attempt allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLimits {
    /// Text-to-speech attempts
    pub tts: u32,
    /// Speech-to-text attempts
    pub stt: u32,
    /// Translation attempts
    pub translate: u32,
}

impl FeatureLimits {
    /// Allowance for one feature
    #[must_use]
    pub const fn get(&self, feature: Feature) -> u32 {
        match feature {
            Feature::Tts => self.tts,
            Feature::Stt => self.stt,
            Feature::Translate => self.translate,
        }
    }
}

/// Free attempts per feature for anonymous callers
pub const ANONYMOUS_LIMITS: FeatureLimits = FeatureLimits {
    tts: 3,
    stt: 2,
    translate: 3,
};

/// Per-feature input length caps for text-producing features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    /// Text-to-speech characters
    pub tts: usize,
    /// Translation characters
    pub translate: usize,
}

impl InputLimits {
    /// Cap for one feature, `None` for audio input
    #[must_use]
    pub const fn get(&self, feature: Feature) -> Option<usize> {
        match feature {
            Feature::Tts => Some(self.tts),
            Feature::Translate => Some(self.translate),
            Feature::Stt => None,
        }
    }
}

/// Input caps for anonymous callers
pub const ANONYMOUS_MAX_CHARS: InputLimits = InputLimits {
    tts: 200,
    translate: 500,
};

/// Input caps for logged-in users
pub const AUTHENTICATED_MAX_CHARS: InputLimits = InputLimits {
    tts: 2500,
    translate: 1000,
};
