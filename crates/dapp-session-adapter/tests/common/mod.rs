/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for dapp-session-adapter tests

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use dapp_session_adapter::{ClientConfig, SessionClient};
use wiremock::{MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Session client pointed at a mock server
pub fn client_for(server: &MockServer) -> SessionClient {
    SessionClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Unsigned access token whose claims name the given user, valid for an hour
pub fn make_access_token(user_id: &str) -> String {
    let header = serde_json::json!({"alg": "none", "typ": "JWT"});
    let payload = serde_json::json!({
        "userId": user_id,
        "exp": Utc::now().timestamp() + 3600,
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
    let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap());

    format!("{header_b64}.{payload_b64}.signature")
}

/// The service's 401 rejection embedding a challenge to sign
#[allow(dead_code)]
pub fn challenge_rejection(challenge: &str) -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(serde_json::json!({
        "name": "NotAuthenticated",
        "message": format!("Challenge = {challenge}"),
        "code": 401,
        "className": "not-authenticated",
    }))
}

/// A successful authentication response issuing the given token
#[allow(dead_code)]
pub fn session_issued(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(serde_json::json!({
        "accessToken": access_token,
    }))
}
