//! Tests for the account API

use super::*;
use crate::transport::{Method, MockTransport};
use std::sync::Arc;
use vaakku_core::storage::{KeyValueStore, TOKEN_KEY};
use vaakku_core::MemoryStore;

fn client() -> (Arc<MemoryStore>, Arc<MockTransport>, VaakkuClient) {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockTransport::new());
    let client = VaakkuClient::new(store.clone(), mock.clone());
    (store, mock, client)
}

fn auth_body(token: &str) -> Value {
    json!({
        "token": token,
        "user": { "_id": "u1", "email": "asha@example.com", "credits": 1000, "hasSarvamKey": false }
    })
}

fn strong() -> SecureString {
    SecureString::new("Str0ng!pass")
}

#[tokio::test]
async fn test_login_stores_session() {
    let (store, mock, client) = client();
    mock.push_json(200, auth_body("tok-1"));

    let user = client.login(" asha@example.com ", &strong()).await.unwrap();
    assert_eq!(user.id.as_deref(), Some("u1"));
    assert_eq!(user.credits, Some(1000));

    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert_eq!(client.session().user().unwrap().email, "asha@example.com");

    let sent = mock.requests();
    assert_eq!(sent[0].request.path, "/auth/login");
    assert_eq!(sent[0].request.json_body().unwrap()["email"], "asha@example.com");
    assert!(sent[0].caller.is_anonymous());
}

#[tokio::test]
async fn test_login_failure_keeps_existing_state() {
    let (_, mock, client) = client();
    mock.push_json(401, json!({ "error": "Invalid email or password" }));

    let err = client.login("asha@example.com", &strong()).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_login_rejects_missing_fields() {
    let (_, mock, client) = client();

    assert!(matches!(
        client.login("", &strong()).await,
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        client.login("asha@example.com", &SecureString::new(" ")).await,
        Err(Error::InvalidInput(_))
    ));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_signup_checks_password_policy_first() {
    let (_, mock, client) = client();

    let err = client
        .signup("asha@example.com", &SecureString::new("weakpass"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(mock.request_count(), 0);

    mock.push_json(201, auth_body("tok-2"));
    client.signup("asha@example.com", &strong()).await.unwrap();
    assert_eq!(mock.requests()[0].request.path, "/auth/signup");
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_signup_without_token_is_invalid_response() {
    let (_, mock, client) = client();
    mock.push_json(200, json!({ "token": "", "user": {} }));

    let err = client.signup("asha@example.com", &strong()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (_, mock, client) = client();
    mock.push_json(200, auth_body("tok-1"));
    client.login("asha@example.com", &strong()).await.unwrap();

    client.logout().unwrap();
    assert!(!client.session().is_authenticated());
    assert!(client.session().user().is_none());
}

#[tokio::test]
async fn test_refresh_user_when_logged_out_sends_nothing() {
    let (_, mock, client) = client();
    assert!(client.refresh_user().await.is_none());
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_refresh_user_updates_profile() {
    let (_, mock, client) = client();
    mock.push_json(200, auth_body("tok-1"));
    client.login("asha@example.com", &strong()).await.unwrap();

    mock.push_json(200, json!({ "user": { "email": "asha@example.com", "credits": 42, "isAdmin": true } }));
    let user = client.refresh_user().await.unwrap();
    assert_eq!(user.credits, Some(42));
    assert!(user.is_admin);
    assert_eq!(client.session().user().unwrap().credits, Some(42));
}

#[tokio::test]
async fn test_refresh_user_failure_drops_profile_keeps_token() {
    let (_, mock, client) = client();
    mock.push_json(200, auth_body("tok-1"));
    client.login("asha@example.com", &strong()).await.unwrap();

    mock.push_json(500, json!({ "error": "db down" }));
    assert!(client.refresh_user().await.is_none());
    assert!(client.session().user().is_none());
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_refresh_user_401_logs_out() {
    let (_, mock, client) = client();
    mock.push_json(200, auth_body("tok-1"));
    client.login("asha@example.com", &strong()).await.unwrap();

    mock.push_json(401, json!({ "error": "jwt expired" }));
    assert!(client.refresh_user().await.is_none());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_update_api_key_set_and_clear() {
    let (_, mock, client) = client();
    mock.push_json(200, auth_body("tok-1"));
    client.login("asha@example.com", &strong()).await.unwrap();

    mock.push_json(200, json!({ "success": true }));
    mock.push_json(200, json!({ "user": { "email": "asha@example.com", "hasSarvamKey": true } }));
    let user = client
        .update_api_key(Some(&SecureString::new(" sk-abc ")))
        .await
        .unwrap()
        .unwrap();
    assert!(user.has_sarvam_key);

    mock.push_raw(204, "");
    mock.push_json(200, json!({ "user": { "email": "asha@example.com" } }));
    let user = client.update_api_key(None).await.unwrap().unwrap();
    assert!(!user.has_sarvam_key);

    let sent = mock.requests();
    assert_eq!(sent[1].request.method, Method::Patch);
    assert_eq!(sent[1].request.path, "/user/sarvam-api-key");
    assert_eq!(sent[1].request.json_body().unwrap()["sarvamApiKey"], "sk-abc");
    assert_eq!(sent[3].request.json_body().unwrap()["sarvamApiKey"], "");
}

#[tokio::test]
async fn test_history_with_filter() {
    let (_, mock, client) = client();
    mock.push_json(
        200,
        json!({ "items": [
            { "type": "translate", "input": "hi", "output": "namaste", "createdAt": "2025-03-01T10:00:00Z" }
        ] }),
    );

    let items = client.history(Some(Feature::Translate)).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].output, "namaste");

    let sent = mock.requests();
    assert_eq!(sent[0].request.path, "/history");
    assert_eq!(
        sent[0].request.query,
        vec![("type".to_string(), "translate".to_string())]
    );
}

#[tokio::test]
async fn test_history_failure_fallback_message() {
    let (_, mock, client) = client();
    mock.push_raw(500, "oops");

    match client.history(None).await.unwrap_err() {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to load history");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(mock.requests()[0].request.query.is_empty());
}

#[test]
fn test_outcome_error_mapping() {
    assert!(matches!(
        outcome_error(ApiOutcome::AuthExpired, "x"),
        Error::SessionExpired
    ));
    assert!(matches!(
        outcome_error(ApiOutcome::OtherError { status: 404, message: None }, "Not here"),
        Error::Api { status: 404, ref message } if message == "Not here"
    ));
}

fn history_entry(kind: &str, input: &str, output: &str) -> HistoryEntry {
    HistoryEntry {
        id: Some("h1".to_string()),
        kind: kind.to_string(),
        input: input.to_string(),
        output: output.to_string(),
        target_language_code: Some("hi-IN".to_string()),
        created_at: None,
    }
}

#[tokio::test]
async fn test_replay_history_speaks_entry_text() {
    let (_, mock, client) = client();
    mock.push_json(200, json!({ "audios": ["UklGRg=="] }));

    let speech = client
        .replay_history(&history_entry("stt", "rec.webm", " hello world "))
        .await
        .unwrap();
    assert_eq!(speech.audio_base64, "UklGRg==");

    let sent = mock.requests();
    assert_eq!(sent[0].request.path, "/ai/tts");
    let body = sent[0].request.json_body().unwrap();
    assert_eq!(body["text"], "hello world");
    assert_eq!(body["target_language_code"], "en-IN");
    assert_eq!(body["speaker"], "shubh");
    assert_eq!(body["model"], "bulbul:v3");
}

#[tokio::test]
async fn test_replay_history_uses_entry_language_for_tts() {
    let (_, mock, client) = client();
    mock.push_json(200, json!({ "audios": ["UklGRg=="] }));

    client
        .replay_history(&history_entry("tts", "namaste", ""))
        .await
        .unwrap();

    let requests = mock.requests();
    let body = requests[0].request.json_body().unwrap();
    assert_eq!(body["text"], "namaste");
    assert_eq!(body["target_language_code"], "hi-IN");
}

#[tokio::test]
async fn test_replay_history_refuses_entries_without_speech() {
    let (_, mock, client) = client();

    for entry in [
        history_entry("translate", "hi", "namaste"),
        history_entry("tts", "  ", ""),
        history_entry("stt", "rec.webm", ""),
    ] {
        assert_eq!(
            client.replay_history(&entry).await.unwrap_err(),
            FlowError::EmptyInput { feature: Feature::Tts }
        );
    }
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_replay_history_failure_messages() {
    let (_, mock, client) = client();
    let entry = history_entry("tts", "namaste", "");

    mock.push_raw(500, "oops");
    match client.replay_history(&entry).await.unwrap_err() {
        FlowError::TransientRequestFailure { status, message, .. } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "Play failed");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    mock.push_json(500, json!({ "error": "Provider down" }));
    match client.replay_history(&entry).await.unwrap_err() {
        FlowError::TransientRequestFailure { message, .. } => assert_eq!(message, "Provider down"),
        other => panic!("unexpected error: {:?}", other),
    }

    mock.push_json(200, json!({ "audios": [] }));
    match client.replay_history(&entry).await.unwrap_err() {
        FlowError::TransientRequestFailure { status, message, .. } => {
            assert_eq!(status, None);
            assert_eq!(message, "No audio returned");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

fn login_as(client: &VaakkuClient, is_admin: bool) {
    let user = UserProfile {
        email: "asha@example.com".to_string(),
        is_admin,
        ..Default::default()
    };
    client
        .session()
        .set_session(&SecureString::new("tok-1"), &user)
        .unwrap();
}

#[tokio::test]
async fn test_admin_stats_refused_for_non_admins() {
    let (_, mock, client) = client();

    assert!(matches!(client.admin_stats().await, Err(Error::Forbidden(_))));

    login_as(&client, false);
    assert!(matches!(client.admin_stats().await, Err(Error::Forbidden(_))));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_admin_stats_for_admin() {
    let (_, mock, client) = client();
    login_as(&client, true);
    mock.push_json(
        200,
        json!({
            "totalUsers": 42,
            "signupsLast7Days": 5,
            "usage": { "tts": 10, "stt": 4, "translate": 7 },
            "mostUsedFeature": "tts",
            "recentSignups": [{ "email": "new@example.com", "createdAt": "2025-03-01T10:00:00Z" }]
        }),
    );

    let stats = client.admin_stats().await.unwrap();
    assert_eq!(stats.total_users, 42);
    assert_eq!(stats.signups_last_7_days, 5);
    assert_eq!(stats.most_used(), Some(Feature::Tts));
    assert_eq!(stats.recent_signups.len(), 1);

    let sent = mock.requests();
    assert_eq!(sent[0].request.method, Method::Get);
    assert_eq!(sent[0].request.path, "/admin/stats");
    assert!(!sent[0].caller.is_anonymous());
}

#[tokio::test]
async fn test_admin_stats_failure_fallback_message() {
    let (_, mock, client) = client();
    login_as(&client, true);
    mock.push_raw(500, "oops");

    match client.admin_stats().await.unwrap_err() {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to load stats");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
