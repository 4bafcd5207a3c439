//! Response Classification
//!
//! Every raw response is folded exactly once into an [`ApiOutcome`]. Callers
//! match on the outcome and never look at status codes or error bodies again.

use crate::transport::RawResponse;
use serde_json::Value;

#[cfg(test)]
mod tests;

/// Error code the server sends when an anonymous caller has used up a feature
pub const ANONYMOUS_LIMIT_REACHED: &str = "ANONYMOUS_LIMIT_REACHED";

/// Path fragments whose 401 responses do not end the session
///
/// Failed credentials on login/signup are expected, and AI endpoints may
/// answer 401 for provider-side reasons.
const SESSION_CARVE_OUTS: &[&str] = &["/auth/login", "/auth/signup", "/ai/"];

/// Error body as sent by the API
///
/// Fields are read one by one, so a field of an unexpected type never hides
/// the others.
#[derive(Debug, Default)]
struct ErrorBody {
    code: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            code: field("code"),
            error: field("error"),
            message: field("message"),
        }
    }

    /// `error` first, then `message`; blank strings are ignored
    fn into_message(self) -> Option<String> {
        self.error
            .filter(|s| !s.trim().is_empty())
            .or(self.message.filter(|s| !s.trim().is_empty()))
    }
}

/// Classified result of one API call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// 2xx with its JSON payload (`Null` for an empty body)
    Success(Value),
    /// The server reported the anonymous limit for this feature
    QuotaExceeded {
        /// HTTP status
        status: u16,
        /// Server message, if any
        message: Option<String>,
    },
    /// 401 on a request that is allowed to end the session
    AuthExpired,
    /// Anything else
    OtherError {
        /// HTTP status
        status: u16,
        /// Server message, if any
        message: Option<String>,
    },
}

impl ApiOutcome {
    /// `true` for `Success`
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }
}

/// `true` if a 401 on `path` must not invalidate the session
#[must_use]
pub fn is_session_carve_out(path: &str) -> bool {
    SESSION_CARVE_OUTS.iter().any(|p| path.contains(p))
}

/// Classify a raw response received for `path`
///
/// The quota code is checked before the status so that a quota signal is
/// never mistaken for an expired session.
#[must_use]
pub fn classify(path: &str, response: &RawResponse) -> ApiOutcome {
    let status = response.status;

    if (200..300).contains(&status) {
        if response.body.trim().is_empty() {
            return ApiOutcome::Success(Value::Null);
        }
        return match serde_json::from_str(&response.body) {
            Ok(value) => ApiOutcome::Success(value),
            Err(e) => ApiOutcome::OtherError {
                status,
                message: Some(format!("Invalid response from server: {}", e)),
            },
        };
    }

    let body = ErrorBody::parse(&response.body);

    if body.code.as_deref() == Some(ANONYMOUS_LIMIT_REACHED) {
        return ApiOutcome::QuotaExceeded {
            status,
            message: body.into_message(),
        };
    }

    if status == 401 && !is_session_carve_out(path) {
        return ApiOutcome::AuthExpired;
    }

    ApiOutcome::OtherError {
        status,
        message: body.into_message(),
    }
}
