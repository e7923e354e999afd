//! Integration tests for VerificationClient.
//!
//! Uses wiremock for both verification backends. Tests cover the plain path,
//! the one-shot environment auto-fix, HTTP status mapping and malformed bodies.

use std::time::Duration;

use serde_json::json;
use storekit_verify::{
    CancellationToken, Endpoint, Environment, ReceiptData, SharedSecret, VerificationClient,
    VerificationRequest, VerifyError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCTION_PATH: &str = "/production/verifyReceipt";
const SANDBOX_PATH: &str = "/sandbox/verifyReceipt";

fn create_test_client(mock_server: &MockServer) -> VerificationClient {
    VerificationClient::builder()
        .production_url(format!("{}{PRODUCTION_PATH}", mock_server.uri()))
        .sandbox_url(format!("{}{SANDBOX_PATH}", mock_server.uri()))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("failed to create client")
}

fn sample_request() -> VerificationRequest {
    VerificationRequest::new(ReceiptData::new("abc123").unwrap())
        .with_shared_secret(SharedSecret::new("secret").unwrap())
}

fn sample_body() -> serde_json::Value {
    json!({
        "receipt-data": "YWJjMTIz",
        "password": "secret",
        "exclude-old-transactions": false
    })
}

#[tokio::test]
async fn test_verify_valid_receipt_in_production() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(sample_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "environment": "Production",
            "receipt": { "bundle_id": "com.example.app", "in_app": [] }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SANDBOX_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let response = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .expect("verify failed");

    assert!(response.status.is_valid());
    assert_eq!(response.environment, Some(Environment::Production));
    assert_eq!(
        response.receipt.and_then(|receipt| receipt.bundle_id).as_deref(),
        Some("com.example.app")
    );
    assert_eq!(client.endpoint(), Endpoint::Production);
}

#[tokio::test]
async fn test_verify_sandbox_receipt_is_resubmitted_to_sandbox() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .and(body_json(sample_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 21007 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SANDBOX_PATH))
        .and(body_json(sample_body()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": 0, "environment": "Sandbox" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let response = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .expect("verify failed");

    assert_eq!(response.status.as_i32(), 0);
    assert_eq!(response.environment, Some(Environment::Sandbox));
    assert_eq!(client.endpoint(), Endpoint::Sandbox);
    assert!(!client.is_auto_fix_armed());
}

#[tokio::test]
async fn test_verify_double_mismatch_is_not_resubmitted_again() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 21007 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SANDBOX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 21008 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let response = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .expect("verify failed");

    assert_eq!(response.status.as_i32(), 21008);
    assert_eq!(client.endpoint(), Endpoint::Sandbox);
}

#[tokio::test]
async fn test_verify_without_auto_fix_returns_mismatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 21007 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SANDBOX_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server).disable_auto_fix();
    let response = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .expect("verify failed");

    assert_eq!(response.status.as_i32(), 21007);
    assert_eq!(client.endpoint(), Endpoint::Production);
}

#[tokio::test]
async fn test_verify_500_maps_to_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let err = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    match err {
        VerifyError::HttpStatus {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "500 Internal Server Error");
            assert_eq!(body.as_deref(), Some("upstream failure"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    assert_eq!(client.endpoint(), Endpoint::Production);
}

#[tokio::test]
async fn test_verify_malformed_body_maps_to_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let err = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::Decode(_)));
    assert!(!err.is_transport());
    assert!(client.is_auto_fix_armed());
}

#[tokio::test]
async fn test_verify_keeps_raw_body() {
    let mock_server = MockServer::start().await;
    let raw = r#"{"status":21004,"environment":"Production"}"#;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let response = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .expect("verify failed");

    assert_eq!(response.status.as_i32(), 21004);
    assert_eq!(response.raw_body, raw.as_bytes());
}

#[tokio::test]
async fn test_verify_cancelled_token_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client.verify(&sample_request(), &cancel).await.unwrap_err();
    assert!(matches!(err, VerifyError::Cancelled));
}

#[tokio::test]
async fn test_verify_cancellation_during_slow_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": 0 }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = client.verify(&sample_request(), &cancel).await.unwrap_err();
    assert!(matches!(err, VerifyError::Cancelled));
    assert_eq!(client.endpoint(), Endpoint::Production);
}

#[tokio::test]
async fn test_verify_failed_resubmission_keeps_production_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PRODUCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 21007 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(SANDBOX_PATH))
        .and(body_json(sample_body()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_test_client(&mock_server);
    let err = client
        .verify(&sample_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::Decode(_)));
    assert_eq!(client.endpoint(), Endpoint::Production);
    assert!(!client.is_auto_fix_armed());
}
