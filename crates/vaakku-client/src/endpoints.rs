//! API Endpoints and Payloads
//!
//! Paths and wire types of the Vaakku REST API. Request types are what a
//! caller fills in; the JSON actually sent is built by the request flow once
//! the caller's input limits are known.

use crate::error::{Error, Result};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use vaakku_core::languages::{AUTO_DETECT, DEFAULT_SPEAKER, DEFAULT_TRANSLATE_TARGET, DEFAULT_TTS_LANGUAGE};
use vaakku_core::{Feature, UserProfile};


// ============================================================================
// Paths
// ============================================================================

/// `POST` text-to-speech
pub const TTS_PATH: &str = "/ai/tts";
/// `POST` speech-to-text (multipart)
pub const STT_PATH: &str = "/ai/stt";
/// `POST` translation
pub const TRANSLATE_PATH: &str = "/ai/translate";
/// `POST` login
pub const LOGIN_PATH: &str = "/auth/login";
/// `POST` signup
pub const SIGNUP_PATH: &str = "/auth/signup";
/// `GET` current user
pub const ME_PATH: &str = "/auth/me";
/// `PATCH` personal provider API key
pub const API_KEY_PATH: &str = "/user/sarvam-api-key";
/// `GET` recent results
pub const HISTORY_PATH: &str = "/history";
/// `GET` usage summary, admins only
pub const ADMIN_STATS_PATH: &str = "/admin/stats";

/// Speech model requested for TTS
pub const TTS_MODEL: &str = "bulbul:v3";

/// Allowed speaking pace
pub const PACE_RANGE: (f32, f32) = (0.5, 2.0);

/// Endpoint of a metered feature
#[must_use]
pub const fn feature_path(feature: Feature) -> &'static str {
    match feature {
        Feature::Tts => TTS_PATH,
        Feature::Stt => STT_PATH,
        Feature::Translate => TRANSLATE_PATH,
    }
}

// ============================================================================
// Text-to-speech
// ============================================================================

/// Text-to-speech request
#[derive(Debug, Clone, PartialEq)]
pub struct TtsRequest {
    /// Text to speak
    pub text: String,
    /// Language code, e.g. `hi-IN`
    pub language: String,
    /// Voice name
    pub speaker: String,
    /// Speaking pace, 0.5 to 2.0
    pub pace: f32,
}

impl TtsRequest {
    /// Request with default language, voice and pace
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: DEFAULT_TTS_LANGUAGE.to_string(),
            speaker: DEFAULT_SPEAKER.to_string(),
            pace: 1.0,
        }
    }

    /// Set the language code
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = code.into();
        self
    }

    /// Set the voice
    #[must_use]
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into().to_lowercase();
        self
    }

    /// Set the pace, clamped to the allowed range
    #[must_use]
    pub fn with_pace(mut self, pace: f32) -> Self {
        self.pace = if pace.is_finite() {
            pace.clamp(PACE_RANGE.0, PACE_RANGE.1)
        } else {
            1.0
        };
        self
    }

    /// Wire body with `text` already prepared for the caller
    pub(crate) fn body(&self, text: &str) -> TtsBody<'_> {
        TtsBody {
            text: text.to_string(),
            target_language_code: &self.language,
            speaker: &self.speaker,
            model: TTS_MODEL,
            pace: self.pace,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TtsBody<'a> {
    text: String,
    target_language_code: &'a str,
    speaker: &'a str,
    model: &'static str,
    pace: f32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TtsResponse {
    #[serde(default)]
    audios: Vec<String>,
}

impl TtsResponse {
    /// First non-empty audio clip
    pub(crate) fn into_first_audio(self) -> Option<String> {
        self.audios.into_iter().find(|a| !a.is_empty())
    }
}

/// Synthesized speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechOutput {
    /// Base64-encoded WAV audio
    pub audio_base64: String,
}

impl SpeechOutput {
    /// Decode the audio to WAV bytes
    pub fn decode_audio(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.audio_base64.trim())
            .map_err(|e| Error::InvalidResponse(format!("audio is not valid base64: {}", e)))
    }

    /// `data:` URL for embedding the audio
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:audio/wav;base64,{}", self.audio_base64)
    }
}

// ============================================================================
// Speech-to-text
// ============================================================================

/// What the STT endpoint should produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SttMode {
    /// Transcript in the spoken language
    #[default]
    Transcribe,
    /// English translation of the speech
    Translate,
    /// Transcript transliterated to Latin script
    Translit,
    /// Mixed-script transcript for code-mixed speech
    Codemix,
}

impl SttMode {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SttMode::Transcribe => "transcribe",
            SttMode::Translate => "translate",
            SttMode::Translit => "translit",
            SttMode::Codemix => "codemix",
        }
    }
}

impl fmt::Display for SttMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SttMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transcribe" => Ok(SttMode::Transcribe),
            "translate" => Ok(SttMode::Translate),
            "translit" => Ok(SttMode::Translit),
            "codemix" => Ok(SttMode::Codemix),
            other => Err(Error::InvalidInput(format!(
                "unknown STT mode '{}' (expected transcribe, translate, translit or codemix)",
                other
            ))),
        }
    }
}

/// An audio file to transcribe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    /// File name reported to the server
    pub file_name: String,
    /// MIME type
    pub mime: String,
    /// Audio content
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    /// Wrap in-memory audio
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an audio file, guessing its MIME type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        Ok(Self::new(file_name, mime_for_path(path), bytes))
    }

    /// `true` if there is no audio data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME type for an audio file name
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "webm" => "audio/webm",
        "ogg" | "oga" => "audio/ogg",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        _ => "audio/wav",
    }
}

/// STT result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    /// Recognized (or translated) text
    #[serde(default)]
    pub transcript: String,
    /// Detected language, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

// ============================================================================
// Translation
// ============================================================================

/// Translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    /// Text to translate
    pub input: String,
    /// Source language code or `auto`
    pub source: String,
    /// Target language code
    pub target: String,
}

impl TranslateRequest {
    /// Request with automatic source detection and the default target
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            source: AUTO_DETECT.to_string(),
            target: DEFAULT_TRANSLATE_TARGET.to_string(),
        }
    }

    /// Set the source language
    #[must_use]
    pub fn with_source(mut self, code: impl Into<String>) -> Self {
        self.source = code.into();
        self
    }

    /// Set the target language
    #[must_use]
    pub fn with_target(mut self, code: impl Into<String>) -> Self {
        self.target = code.into();
        self
    }

    pub(crate) fn body(&self, input: &str) -> TranslateBody<'_> {
        TranslateBody {
            input: input.to_string(),
            source_language_code: &self.source,
            target_language_code: &self.target,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateBody<'a> {
    input: String,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    translation: Option<String>,
}

impl TranslateResponse {
    pub(crate) fn into_text(self) -> String {
        self.translated_text
            .or(self.translation)
            .unwrap_or_default()
    }
}

// ============================================================================
// Account
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub(crate) token: String,
    #[serde(default)]
    pub(crate) user: UserProfile,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MeResponse {
    #[serde(default)]
    pub(crate) user: Option<UserProfile>,
}

// ============================================================================
// History
// ============================================================================

/// One past result kept by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Server-side id
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `tts`, `stt` or `translate`
    #[serde(rename = "type")]
    pub kind: String,
    /// Text sent (TTS, translation) or file name (STT)
    #[serde(default)]
    pub input: String,
    /// Text produced (STT, translation)
    #[serde(default)]
    pub output: String,
    /// Target language, when applicable
    #[serde(default, rename = "target_language_code", skip_serializing_if = "Option::is_none")]
    pub target_language_code: Option<String>,
    /// When the result was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Feature the entry belongs to, if recognized
    #[must_use]
    pub fn feature(&self) -> Option<Feature> {
        self.kind.parse().ok()
    }

    /// Text to show as the entry's result
    #[must_use]
    pub fn display_output(&self) -> String {
        match self.feature() {
            Some(Feature::Tts) if !self.input.is_empty() => format!(
                "Generated audio ({})",
                self.target_language_code.as_deref().unwrap_or("-")
            ),
            Some(Feature::Tts) => String::new(),
            _ => self.output.clone(),
        }
    }

    /// Speech request that plays the entry again
    ///
    /// TTS entries speak their input in their own language, STT entries
    /// speak the transcript in the default one. `None` for translations and
    /// for entries with nothing to speak.
    #[must_use]
    pub fn replay_request(&self) -> Option<TtsRequest> {
        let (text, language) = match self.feature()? {
            Feature::Tts => (
                &self.input,
                self.target_language_code
                    .as_deref()
                    .filter(|code| !code.is_empty())
                    .unwrap_or(DEFAULT_TTS_LANGUAGE),
            ),
            Feature::Stt => (&self.output, DEFAULT_TTS_LANGUAGE),
            Feature::Translate => return None,
        };

        let text = text.trim();
        (!text.is_empty()).then(|| TtsRequest::new(text).with_language(language))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub(crate) items: Vec<HistoryEntry>,
}

// ============================================================================
// Admin
// ============================================================================

/// Service-wide usage summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    /// Registered accounts
    pub total_users: u64,
    /// Accounts created in the last seven days
    #[serde(rename = "signupsLast7Days")]
    pub signups_last_7_days: u64,
    /// Accounts with their own provider key
    pub users_with_api_key_count: u64,
    /// In-app credits held by accounts with their own key
    pub credits_users_with_key: f64,
    /// Calls per feature
    pub usage: FeatureUsage,
    /// `tts`, `stt` or `translate`
    pub most_used_feature: Option<String>,
    /// Latest accounts, newest first
    pub recent_signups: Vec<RecentSignup>,
}

impl AdminStats {
    /// Most used feature, if recognized
    #[must_use]
    pub fn most_used(&self) -> Option<Feature> {
        self.most_used_feature.as_deref()?.parse().ok()
    }
}

/// Call counts per feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureUsage {
    /// Text-to-speech calls
    pub tts: u64,
    /// Speech-to-text calls
    pub stt: u64,
    /// Translation calls
    pub translate: u64,
}

impl FeatureUsage {
    /// Calls of one feature
    #[must_use]
    pub const fn get(&self, feature: Feature) -> u64 {
        match feature {
            Feature::Tts => self.tts,
            Feature::Stt => self.stt,
            Feature::Translate => self.translate,
        }
    }

    /// Calls of all features
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.tts.saturating_add(self.stt).saturating_add(self.translate)
    }
}

/// A recently created account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentSignup {
    /// Account email
    pub email: String,
    /// When the account was created
    pub created_at: Option<DateTime<Utc>>,
    /// Last authenticated call, if any
    pub last_active_at: Option<DateTime<Utc>>,
}
