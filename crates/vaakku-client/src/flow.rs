//! Feature Request Flow
//!
//! Runs one metered call end to end:
//!
//! 1. resolve the caller identity
//! 2. refuse locally if an anonymous caller has used up the feature
//! 3. send with the caller's attribution header
//! 4. on success, count the attempt (anonymous) or refresh the profile (logged in)
//! 5. on the server's quota signal, mark the feature exhausted
//! 6. on an expired session, clear it and point the caller at the login route

mod error;


pub use error::{exhausted_message, fallback_message, FailureKind, FlowError, FlowResult};

use crate::config::ClientConfig;
use crate::endpoints::{
    feature_path, AudioUpload, SpeechOutput, SttMode, Transcription, TranslateRequest,
    TranslateResponse, TtsRequest, TtsResponse,
};
use crate::error::Result;
use crate::outcome::{classify, ApiOutcome};
use crate::transport::{ApiRequest, FilePart, HttpTransport, MultipartForm, Transport};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use vaakku_core::{
    CallerIdentity, EntitlementTracker, Feature, IdentityResolver, QuotaState, SessionStore,
    SharedStore, UserFriendlyError, LOGIN_ROUTE,
};

/// Client for one user profile
///
/// Holds no state of its own: identity, counters and session are read from
/// the profile store at the start of every call.
#[derive(Clone)]
pub struct VaakkuClient {
    identity: IdentityResolver,
    tracker: EntitlementTracker,
    session: SessionStore,
    transport: Arc<dyn Transport>,
}

impl VaakkuClient {
    /// Create a client over a profile store and a transport
    #[must_use]
    pub fn new(store: SharedStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            identity: IdentityResolver::new(store.clone()),
            tracker: EntitlementTracker::new(store.clone()),
            session: SessionStore::new(store),
            transport,
        }
    }

    /// Create a client talking HTTP to the configured API
    pub fn from_config(config: &ClientConfig, store: SharedStore) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(store, Arc::new(transport)))
    }

    /// Identity resolver
    #[must_use]
    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    /// Anonymous usage tracker
    #[must_use]
    pub fn tracker(&self) -> &EntitlementTracker {
        &self.tracker
    }

    /// Session store
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Free attempts left for an anonymous caller
    #[must_use]
    pub fn remaining(&self, feature: Feature) -> u32 {
        self.tracker.remaining(feature)
    }

    /// `true` if an anonymous caller has no attempts left
    #[must_use]
    pub fn is_exhausted(&self, feature: Feature) -> bool {
        self.tracker.is_exhausted(feature)
    }

    /// Quota state shown to the current caller; `None` when logged in
    #[must_use]
    pub fn quota(&self, feature: Feature) -> Option<QuotaState> {
        self.identity
            .resolve()
            .is_anonymous()
            .then(|| self.tracker.state(feature))
    }

    /// Send an unmetered request as the current caller
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiOutcome> {
        let caller = self.identity.resolve();
        self.dispatch(request, &caller).await
    }

    async fn dispatch(&self, request: &ApiRequest, caller: &CallerIdentity) -> Result<ApiOutcome> {
        let response = self.transport.send(request, caller).await?;
        let outcome = classify(&request.path, &response);

        if outcome == ApiOutcome::AuthExpired {
            warn!(path = %request.path, "Session rejected by server, logging out");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "Failed to clear rejected session");
            }
        }

        Ok(outcome)
    }

    /// Run a metered call
    ///
    /// `build` turns the resolved caller into the request to send (so input
    /// limits can depend on the caller); `accept` turns the success payload
    /// into the result, or into a message if the payload is unusable. A
    /// rejected payload counts as a failure and is not metered.
    #[instrument(skip_all, fields(feature = %feature))]
    pub async fn attempt_feature<T, B, A>(&self, feature: Feature, build: B, accept: A) -> FlowResult<T>
    where
        B: FnOnce(&CallerIdentity) -> FlowResult<ApiRequest>,
        A: FnOnce(Value) -> std::result::Result<T, String>,
    {
        let caller = self.identity.resolve();

        if caller.is_anonymous() && self.tracker.is_exhausted(feature) {
            info!("Anonymous quota exhausted, refusing locally");
            return Err(FlowError::LocalQuotaExceeded { feature });
        }

        let request = build(&caller)?;

        let outcome = match self.dispatch(&request, &caller).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Request failed");
                return Err(FlowError::TransientRequestFailure {
                    feature,
                    status: None,
                    message: e.user_message(),
                });
            }
        };

        match outcome {
            ApiOutcome::Success(payload) => {
                let output = accept(payload).map_err(|message| FlowError::TransientRequestFailure {
                    feature,
                    status: None,
                    message,
                })?;

                if caller.is_anonymous() {
                    self.tracker.record_attempt(feature);
                    debug!(remaining = self.tracker.remaining(feature), "Anonymous attempt recorded");
                } else if self.refresh_user().await.is_none() {
                    debug!("Profile not refreshed after success");
                }
                Ok(output)
            }
            ApiOutcome::QuotaExceeded { message, .. } => {
                // Counters belong to the anonymous caller only
                if caller.is_anonymous() {
                    self.tracker.force_exhaust(feature);
                }
                Err(FlowError::ServerQuotaExceeded {
                    feature,
                    message: message.unwrap_or_else(|| exhausted_message(feature)),
                })
            }
            ApiOutcome::AuthExpired => Err(FlowError::SessionInvalidated {
                redirect_to: LOGIN_ROUTE,
            }),
            ApiOutcome::OtherError { status, message } => {
                debug!(status, "Request rejected");
                Err(FlowError::TransientRequestFailure {
                    feature,
                    status: Some(status),
                    message: message.unwrap_or_else(|| fallback_message(feature).to_string()),
                })
            }
        }
    }

    /// Synthesize speech
    pub async fn text_to_speech(&self, request: TtsRequest) -> FlowResult<SpeechOutput> {
        let feature = Feature::Tts;
        self.attempt_feature(
            feature,
            |caller| {
                let text = feature
                    .prepare_text(&request.text, caller.is_anonymous())
                    .ok_or(FlowError::EmptyInput { feature })?;
                json_request(feature, &request.body(&text))
            },
            |payload| {
                serde_json::from_value::<TtsResponse>(payload)
                    .unwrap_or_default()
                    .into_first_audio()
                    .map(|audio_base64| SpeechOutput { audio_base64 })
                    .ok_or_else(|| "No audio returned".to_string())
            },
        )
        .await
    }

    /// Transcribe (or translate, transliterate) an audio file
    pub async fn speech_to_text(&self, audio: AudioUpload, mode: SttMode) -> FlowResult<Transcription> {
        let feature = Feature::Stt;
        self.attempt_feature(
            feature,
            |_| {
                if audio.is_empty() {
                    return Err(FlowError::EmptyInput { feature });
                }
                let form = MultipartForm::new()
                    .file(FilePart {
                        field: "file".to_string(),
                        file_name: audio.file_name,
                        mime: audio.mime,
                        bytes: audio.bytes,
                    })
                    .text("mode", mode.as_str());
                Ok(ApiRequest::post_multipart(feature_path(feature), form))
            },
            |payload| {
                serde_json::from_value::<Transcription>(payload)
                    .map_err(|_| fallback_message(feature).to_string())
            },
        )
        .await
    }

    /// Translate text
    pub async fn translate(&self, request: TranslateRequest) -> FlowResult<String> {
        let feature = Feature::Translate;
        self.attempt_feature(
            feature,
            |caller| {
                let input = feature
                    .prepare_text(&request.input, caller.is_anonymous())
                    .ok_or(FlowError::EmptyInput { feature })?;
                json_request(feature, &request.body(&input))
            },
            |payload| {
                Ok(serde_json::from_value::<TranslateResponse>(payload)
                    .unwrap_or_default()
                    .into_text())
            },
        )
        .await
    }
}

fn json_request<B: serde::Serialize>(feature: Feature, body: &B) -> FlowResult<ApiRequest> {
    ApiRequest::post_json(feature_path(feature), body).map_err(|e| {
        FlowError::TransientRequestFailure {
            feature,
            status: None,
            message: e.user_message(),
        }
    })
}
