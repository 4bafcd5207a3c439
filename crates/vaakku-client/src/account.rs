//! Account API
//!
//! Login, signup and the other unmetered calls of a logged-in user.

use crate::endpoints::{
    AdminStats, AuthResponse, HistoryEntry, HistoryResponse, MeResponse, SpeechOutput,
    ADMIN_STATS_PATH, API_KEY_PATH, HISTORY_PATH, LOGIN_PATH, ME_PATH, SIGNUP_PATH,
};
use crate::error::{Error, Result};
use crate::flow::{fallback_message, FlowError, FlowResult, VaakkuClient};
use crate::outcome::ApiOutcome;
use crate::transport::ApiRequest;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};
use vaakku_core::password::validate_password;
use vaakku_core::{Feature, SecureString, UserProfile};

#[cfg(test)]
mod tests;

impl VaakkuClient {
    /// Log in and store the session
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &SecureString) -> Result<UserProfile> {
        let email = require_email(email)?;
        if password.is_blank() {
            return Err(Error::InvalidInput("Password is required".to_string()));
        }
        self.authenticate(LOGIN_PATH, email, password, "Login failed")
            .await
    }

    /// Create an account and store the session
    ///
    /// The password is checked against the password policy before anything
    /// is sent.
    #[instrument(skip_all)]
    pub async fn signup(&self, email: &str, password: &SecureString) -> Result<UserProfile> {
        let email = require_email(email)?;
        if let Some(problem) = validate_password(password.expose()) {
            return Err(Error::InvalidInput(problem));
        }
        self.authenticate(SIGNUP_PATH, email, password, "Signup failed")
            .await
    }

    async fn authenticate(
        &self,
        path: &str,
        email: &str,
        password: &SecureString,
        fallback: &str,
    ) -> Result<UserProfile> {
        let request = ApiRequest::post_json(
            path,
            &json!({ "email": email, "password": password.expose() }),
        )?;

        let auth: AuthResponse = self.call(&request, fallback).await?;
        let token = SecureString::new(auth.token);
        if token.is_blank() {
            return Err(Error::InvalidResponse("no token in response".to_string()));
        }

        self.session().set_session(&token, &auth.user)?;
        info!(email = %auth.user.email, "Logged in");
        Ok(auth.user)
    }

    /// Forget the session locally
    pub fn logout(&self) -> Result<()> {
        self.session().clear()?;
        Ok(())
    }

    /// Re-fetch the profile of the logged-in user
    ///
    /// Returns `None` when logged out or on any failure; a failure also drops
    /// the cached profile (the token is kept unless the server rejected it).
    pub async fn refresh_user(&self) -> Option<UserProfile> {
        if !self.session().is_authenticated() {
            return None;
        }

        let user = match self.call::<MeResponse>(&ApiRequest::get(ME_PATH), "Failed to load profile").await {
            Ok(MeResponse { user: Some(user) }) => user,
            Ok(MeResponse { user: None }) => {
                debug!("Profile response had no user");
                self.drop_cached_user();
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh profile");
                self.drop_cached_user();
                return None;
            }
        };

        if let Err(e) = self.session().set_user(&user) {
            warn!(error = %e, "Failed to cache profile");
        }
        debug!(credits = ?user.credits, "Profile refreshed");
        Some(user)
    }

    fn drop_cached_user(&self) {
        if let Err(e) = self.session().clear_user() {
            warn!(error = %e, "Failed to drop cached profile");
        }
    }

    /// Store or remove the user's personal provider API key
    ///
    /// `None` (or a blank key) removes it. The profile is refreshed
    /// afterwards so `has_sarvam_key` reflects the change.
    pub async fn update_api_key(&self, key: Option<&SecureString>) -> Result<Option<UserProfile>> {
        let value = key
            .filter(|k| !k.is_blank())
            .map(|k| k.expose().trim())
            .unwrap_or("");
        let request = ApiRequest::patch_json(API_KEY_PATH, &json!({ "sarvamApiKey": value }))?;

        let _: Value = self.call(&request, "Failed to update API key").await?;
        info!(cleared = value.is_empty(), "API key updated");
        Ok(self.refresh_user().await)
    }

    /// Most recent results, optionally of one feature only
    pub async fn history(&self, filter: Option<Feature>) -> Result<Vec<HistoryEntry>> {
        let mut request = ApiRequest::get(HISTORY_PATH);
        if let Some(feature) = filter {
            request = request.with_query("type", feature.as_str());
        }

        let response: HistoryResponse = self.call(&request, "Failed to load history").await?;
        Ok(response.items)
    }

    /// Speak a history entry again
    ///
    /// Goes through the metered TTS call. Entries with nothing to speak are
    /// refused with [`FlowError::EmptyInput`] before anything is sent.
    pub async fn replay_history(&self, entry: &HistoryEntry) -> FlowResult<SpeechOutput> {
        let feature = Feature::Tts;
        let Some(request) = entry.replay_request() else {
            return Err(FlowError::EmptyInput { feature });
        };

        self.text_to_speech(request).await.map_err(|err| match err {
            FlowError::TransientRequestFailure {
                feature,
                status,
                message,
            } if message == fallback_message(feature) => FlowError::TransientRequestFailure {
                feature,
                status,
                message: "Play failed".to_string(),
            },
            other => other,
        })
    }

    /// Service-wide usage summary
    ///
    /// Refused locally unless the cached profile belongs to an admin.
    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let is_admin = self.session().user().is_some_and(|user| user.is_admin);
        if !self.session().is_authenticated() || !is_admin {
            return Err(Error::Forbidden("Admin access required".to_string()));
        }

        self.call(&ApiRequest::get(ADMIN_STATS_PATH), "Failed to load stats")
            .await
    }

    /// Send, classify and decode an unmetered call
    async fn call<T: DeserializeOwned>(&self, request: &ApiRequest, fallback: &str) -> Result<T> {
        match self.send(request).await? {
            ApiOutcome::Success(payload) => serde_json::from_value(payload)
                .map_err(|e| Error::InvalidResponse(e.to_string())),
            other => Err(outcome_error(other, fallback)),
        }
    }
}

/// Error for a non-success outcome
fn outcome_error(outcome: ApiOutcome, fallback: &str) -> Error {
    match outcome {
        ApiOutcome::AuthExpired => Error::SessionExpired,
        ApiOutcome::QuotaExceeded { status, message } | ApiOutcome::OtherError { status, message } => {
            Error::Api {
                status,
                message: message.unwrap_or_else(|| fallback.to_string()),
            }
        }
        ApiOutcome::Success(_) => Error::InvalidResponse("unexpected success".to_string()),
    }
}

fn require_email(email: &str) -> Result<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::InvalidInput("Email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(Error::InvalidInput("Enter a valid email address".to_string()));
    }
    Ok(email)
}
