// ABOUTME: Integration tests for the signup webhook
// ABOUTME: Uses a mock HTTP server to check payload shape and failure isolation

use std::time::Duration;

use rentwise_auth::{AuthError, SignupPayload, SignupWebhook};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> SignupPayload {
    SignupPayload {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        user_id: "user-123".to_string(),
    }
}

#[tokio::test]
async fn test_notify_posts_camel_case_payload() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup"))
        .and(body_json(serde_json::json!({
            "name": "Asha Rao",
            "email": "asha@example.com",
            "userId": "user-123"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let webhook = SignupWebhook::new(
        Some(format!("{}/signup", mock_server.uri())),
        Duration::from_secs(5),
    )
    .unwrap();

    let handle = webhook.notify(payload()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_reported_by_send_but_swallowed_by_notify() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let webhook = SignupWebhook::new(Some(mock_server.uri()), Duration::from_secs(5)).unwrap();

    let result = webhook.send(&payload()).await;
    assert!(matches!(result, Err(AuthError::WebhookStatus(500))));

    // The background task finishes cleanly even though delivery failed
    webhook.notify(payload()).unwrap().await.unwrap();
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let webhook =
        SignupWebhook::new(Some(mock_server.uri()), Duration::from_millis(100)).unwrap();
    let result = webhook.send(&payload()).await;
    assert!(matches!(result, Err(AuthError::Http(_))));
}

#[tokio::test]
async fn test_disabled_webhook_is_noop() {
    let webhook = SignupWebhook::new(None, Duration::from_secs(1)).unwrap();
    assert!(!webhook.is_enabled());
    assert!(webhook.notify(payload()).is_none());
    assert!(webhook.send(&payload()).await.is_ok());
}
