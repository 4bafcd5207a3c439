use super::*;
use serde_json::json;

fn raw(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        body: body.to_string(),
    }
}

#[test]
fn test_success_parses_json() {
    let outcome = classify("/ai/tts", &raw(200, r#"{"audios":["AAA"]}"#));
    assert_eq!(outcome, ApiOutcome::Success(json!({"audios": ["AAA"]})));
    assert!(outcome.is_success());
}

#[test]
fn test_success_with_empty_body_is_null() {
    assert_eq!(classify("/user/sarvam-api-key", &raw(204, "")), ApiOutcome::Success(Value::Null));
}

#[test]
fn test_success_with_garbage_body_is_error() {
    let outcome = classify("/ai/tts", &raw(200, "<html>"));
    assert!(matches!(outcome, ApiOutcome::OtherError { status: 200, message: Some(_) }));
}

#[test]
fn test_quota_code_detected() {
    let body = json!({"code": "ANONYMOUS_LIMIT_REACHED", "error": "Free limit reached"}).to_string();
    let outcome = classify("/ai/stt", &raw(403, &body));
    assert_eq!(
        outcome,
        ApiOutcome::QuotaExceeded {
            status: 403,
            message: Some("Free limit reached".to_string()),
        }
    );
}

#[test]
fn test_quota_code_wins_over_401() {
    let body = json!({"code": "ANONYMOUS_LIMIT_REACHED"}).to_string();
    let outcome = classify("/history", &raw(401, &body));
    assert!(matches!(outcome, ApiOutcome::QuotaExceeded { status: 401, message: None }));
}

#[test]
fn test_quota_code_survives_structured_error_field() {
    let body = json!({"code": "ANONYMOUS_LIMIT_REACHED", "error": {"detail": "limit"}}).to_string();
    let outcome = classify("/ai/tts", &raw(429, &body));
    assert_eq!(outcome, ApiOutcome::QuotaExceeded { status: 429, message: None });
}

#[test]
fn test_quota_code_survives_numeric_message() {
    let body = json!({"code": "ANONYMOUS_LIMIT_REACHED", "error": 7, "message": 3}).to_string();
    let outcome = classify("/ai/stt", &raw(429, &body));
    assert_eq!(outcome, ApiOutcome::QuotaExceeded { status: 429, message: None });

    // A 401 carrying the code is still a quota signal, not an expired session
    let outcome = classify("/history", &raw(401, &body));
    assert!(matches!(outcome, ApiOutcome::QuotaExceeded { status: 401, .. }));
}

#[test]
fn test_string_fields_read_beside_odd_ones() {
    let body = json!({"code": 12, "error": ["x"], "message": "Try later"}).to_string();
    assert_eq!(
        classify("/ai/translate", &raw(503, &body)),
        ApiOutcome::OtherError {
            status: 503,
            message: Some("Try later".to_string()),
        }
    );
}

#[test]
fn test_other_codes_are_not_quota() {
    let body = json!({"code": "anonymous_limit_reached", "error": "nope"}).to_string();
    assert!(matches!(classify("/ai/tts", &raw(403, &body)), ApiOutcome::OtherError { .. }));
}

#[test]
fn test_401_outside_carve_out_expires_session() {
    assert_eq!(classify("/auth/me", &raw(401, "{}")), ApiOutcome::AuthExpired);
    assert_eq!(classify("/history", &raw(401, "")), ApiOutcome::AuthExpired);
    assert_eq!(classify("/user/sarvam-api-key", &raw(401, "{}")), ApiOutcome::AuthExpired);
}

#[test]
fn test_401_inside_carve_out_is_plain_error() {
    for path in ["/auth/login", "/auth/signup", "/ai/tts", "/ai/stt", "/ai/translate"] {
        let outcome = classify(path, &raw(401, r#"{"error":"Invalid credentials"}"#));
        assert_eq!(
            outcome,
            ApiOutcome::OtherError {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            },
            "path {}",
            path
        );
    }
}

#[test]
fn test_message_precedence() {
    let both = json!({"error": "from error", "message": "from message"}).to_string();
    assert!(matches!(
        classify("/ai/tts", &raw(500, &both)),
        ApiOutcome::OtherError { message: Some(ref m), .. } if m == "from error"
    ));

    let only_message = json!({"error": "", "message": "from message"}).to_string();
    assert!(matches!(
        classify("/ai/tts", &raw(500, &only_message)),
        ApiOutcome::OtherError { message: Some(ref m), .. } if m == "from message"
    ));

    assert!(matches!(
        classify("/ai/tts", &raw(502, "Bad Gateway")),
        ApiOutcome::OtherError { status: 502, message: None }
    ));
}

#[test]
fn test_carve_out_matching() {
    assert!(is_session_carve_out("/auth/login"));
    assert!(is_session_carve_out("/ai/translate"));
    assert!(!is_session_carve_out("/auth/me"));
    assert!(!is_session_carve_out("/history"));
}
