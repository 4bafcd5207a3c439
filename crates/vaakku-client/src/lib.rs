//! Vaakku Client - Speech & Translation API Client
//!
//! This crate talks to the Vaakku REST API on behalf of one user profile:
//! - Transport: reqwest-based HTTP with caller attribution headers
//! - Outcome: classification of every response into a closed set of cases
//! - Flow: metered TTS / STT / translation calls gated by the anonymous quota
//! - Account: login, signup, profile refresh, API key, history and admin stats
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vaakku_client::{ClientConfig, TtsRequest, VaakkuClient};
//! use vaakku_core::FileStore;
//!
//! let store = Arc::new(FileStore::default_location());
//! let client = VaakkuClient::from_config(&ClientConfig::from_env(), store)?;
//!
//! match client.text_to_speech(TtsRequest::new("Namaste")).await {
//!     Ok(speech) => std::fs::write("out.wav", speech.decode_audio()?)?,
//!     Err(e) if e.is_quota_exhausted() => println!("Sign up for more tries"),
//!     Err(e) => println!("{}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod flow;
pub mod outcome;
pub mod transport;

pub use config::ClientConfig;
pub use endpoints::{
    AdminStats, AudioUpload, FeatureUsage, HistoryEntry, RecentSignup, SpeechOutput, SttMode,
    Transcription, TranslateRequest, TtsRequest,
};
pub use error::{Error, Result};
pub use flow::{FailureKind, FlowError, FlowResult, VaakkuClient};
pub use outcome::{classify, ApiOutcome, ANONYMOUS_LIMIT_REACHED};
pub use transport::{ApiRequest, HttpTransport, Method, MockTransport, RawResponse, Transport};
