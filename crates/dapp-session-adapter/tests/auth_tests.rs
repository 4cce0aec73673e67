/*
[INPUT]:  Mock session service responses and scripted collaborators
[OUTPUT]: Test results for the wallet-authentication handshake
[POS]:    Integration tests - authentication coordinator
[UPDATE]: When the handshake flow changes
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{challenge_rejection, client_for, make_access_token, session_issued, setup_mock_server};
use dapp_session_adapter::{
    AuthenticationCoordinator, CoordinatorConfig, CurrentUser, MockWalletSigner,
    NavigationEvent, RecordingAnalytics, RecordingNavigator, ScriptedPrompt, SessionClient,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

/// Short timings so timeout and grace paths run quickly under test
fn test_config() -> CoordinatorConfig {
    CoordinatorConfig {
        signing_timeout: Duration::from_millis(200),
        navigation_grace: Duration::from_millis(20),
        fallback_location: "/".to_string(),
    }
}

struct Harness {
    coordinator: AuthenticationCoordinator,
    prompt: Arc<ScriptedPrompt>,
    navigator: Arc<RecordingNavigator>,
    analytics: Arc<RecordingAnalytics>,
}

fn harness(client: SessionClient, prompt: ScriptedPrompt) -> Harness {
    let prompt = Arc::new(prompt);
    let navigator = Arc::new(RecordingNavigator::stuck_at("/donate"));
    let analytics = Arc::new(RecordingAnalytics::new());
    let coordinator = AuthenticationCoordinator::new_with_config(
        client,
        prompt.clone(),
        navigator.clone(),
        analytics.clone(),
        test_config(),
    );
    Harness {
        coordinator,
        prompt,
        navigator,
        analytics,
    }
}

fn navigate_count(events: &[NavigationEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, NavigationEvent::Navigate(_)))
        .count()
}

#[tokio::test]
async fn test_absent_user_fails_without_side_effects() {
    let server = setup_mock_server().await;
    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));

    let result = h
        .coordinator
        .authenticate_user(None, true, signer.clone())
        .await;

    assert!(!result);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(signer.signed_messages().is_empty());
    assert!(h.prompt.confirmations().is_empty());
    assert!(h.navigator.events().is_empty());
}

#[tokio::test]
async fn test_user_without_address_fails_without_side_effects() {
    let server = setup_mock_server().await;
    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::default();

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(!result);
    assert!(!user.authenticated);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_already_authenticated_short_circuits() {
    let server = setup_mock_server().await;
    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");
    user.authenticated = true;

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(result);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_challenge_handshake_end_to_end() {
    let server = setup_mock_server().await;
    let issued = make_access_token("0xAA");

    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(
            serde_json::json!({"strategy": "web3", "address": "0xAA"}),
        ))
        .respond_with(challenge_rejection("signme"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(serde_json::json!({
            "strategy": "web3",
            "address": "0xAA",
            "signature": "0xSIG",
        })))
        .respond_with(session_issued(&issued))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let h = harness(client.clone(), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer.clone())
        .await;

    assert!(result);
    assert!(user.authenticated);
    // marker and surrounding whitespace stripped before signing
    assert_eq!(signer.signed_messages(), vec!["signme"]);
    assert_eq!(client.access_token(), Some(issued));
    assert_eq!(h.prompt.confirmations(), vec!["You need to sign in!"]);
    assert_eq!(h.prompt.notices().len(), 1);
    assert_eq!(h.analytics.identified(), vec!["0xAA"]);
    assert!(h.navigator.events().is_empty());
}

#[tokio::test]
async fn test_decline_without_redirect_has_no_navigation() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(challenge_rejection("signme"))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::declining());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer.clone())
        .await;

    assert!(!result);
    assert!(!user.authenticated);
    assert!(signer.signed_messages().is_empty());
    assert!(h.navigator.events().is_empty());
}

#[tokio::test]
async fn test_decline_with_redirect_falls_back_exactly_once() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(challenge_rejection("signme"))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::declining());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), true, signer)
        .await;

    assert!(!result);
    let events = h.navigator.events();
    assert_eq!(
        events,
        vec![
            NavigationEvent::Back,
            NavigationEvent::Navigate("/".to_string()),
        ]
    );
    assert_eq!(navigate_count(&events), 1);
}

#[tokio::test]
async fn test_signing_timeout_discards_late_signature() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(
            serde_json::json!({"strategy": "web3", "address": "0xAA"}),
        ))
        .respond_with(challenge_rejection("signme"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let h = harness(client.clone(), ScriptedPrompt::accepting());
    // signer never settles within the 200ms test timeout
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG").with_delay(Duration::from_secs(10)));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(!result);
    assert!(!user.authenticated);
    assert_eq!(
        h.navigator.events(),
        vec![
            NavigationEvent::Back,
            NavigationEvent::Navigate("/".to_string()),
        ]
    );

    // a signature arriving after the timeout has no observable effect
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!user.authenticated);
    assert!(client.access_token().is_none());
}

#[tokio::test]
async fn test_wallet_rejection_recovers_and_fails() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(challenge_rejection("signme"))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::rejecting("0xAA"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(!result);
    assert_eq!(navigate_count(&h.navigator.events()), 1);
}

#[tokio::test]
async fn test_stale_token_logs_out_before_fresh_attempt() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/authentication"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(
            serde_json::json!({"strategy": "web3", "address": "0xAA"}),
        ))
        .respond_with(session_issued(&make_access_token("0xAA")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    // stored session belongs to a different wallet
    client.tokens().set(make_access_token("0xBB"));

    let h = harness(client, ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(result);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method.as_str(), "DELETE");
    assert_eq!(requests[1].method.as_str(), "POST");
}

#[tokio::test]
async fn test_matching_token_reauthenticates_without_signature() {
    let server = setup_mock_server().await;
    let stored = make_access_token("0xAA");
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(
            serde_json::json!({"strategy": "jwt", "accessToken": stored.clone()}),
        ))
        .respond_with(session_issued(&make_access_token("0xAA")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.tokens().set(stored);

    let h = harness(client, ScriptedPrompt::accepting());
    // a signature request would fail loudly if the fast path ever signed
    let signer = Arc::new(MockWalletSigner::rejecting("0xAA"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer.clone())
        .await;

    assert!(result);
    assert!(user.authenticated);
    assert!(signer.signed_messages().is_empty());
    assert!(h.prompt.confirmations().is_empty());
}

#[tokio::test]
async fn test_immediate_acceptance_skips_consent_and_identifies() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(session_issued(&make_access_token("0xAA")))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(result);
    assert!(h.prompt.confirmations().is_empty());
    assert_eq!(h.analytics.identified(), vec!["0xAA"]);
}

#[tokio::test]
async fn test_unauthorized_without_challenge_fails_quietly() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "name": "NotAuthenticated",
            "message": "Token expired",
            "code": 401,
            "className": "not-authenticated",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(!result);
    assert!(h.prompt.confirmations().is_empty());
    assert!(h.navigator.events().is_empty());
}

#[tokio::test]
async fn test_service_error_fails_quietly() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let result = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(!result);
    assert!(!user.authenticated);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_handshake() {
    let server = setup_mock_server().await;
    let issued = make_access_token("0xAA");

    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(
            serde_json::json!({"strategy": "web3", "address": "0xAA"}),
        ))
        .respond_with(challenge_rejection("signme"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(serde_json::json!({
            "strategy": "web3",
            "address": "0xAA",
            "signature": "0xSIG",
        })))
        .respond_with(session_issued(&issued))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::accepting());
    // keep the attempt in flight long enough for the second caller to join
    let signer =
        Arc::new(MockWalletSigner::new("0xAA", "0xSIG").with_delay(Duration::from_millis(50)));

    let mut user_a = CurrentUser::with_address("0xAA");
    let mut user_b = CurrentUser::with_address("0xAA");

    let (outcome_a, outcome_b) = tokio::join!(
        h.coordinator
            .authenticate_user(Some(&mut user_a), false, signer.clone()),
        h.coordinator
            .authenticate_user(Some(&mut user_b), false, signer.clone()),
    );

    assert!(outcome_a);
    assert!(outcome_b);
    // exactly one consent dialog and one signature for both callers
    assert_eq!(h.prompt.confirmations().len(), 1);
    assert_eq!(signer.signed_messages(), vec!["signme"]);
    // only the initiating caller's state is updated
    assert!(user_a.authenticated);
    assert!(!user_b.authenticated);
}

#[tokio::test]
async fn test_pending_marker_is_cleared_after_failure() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(challenge_rejection("signme"))
        .expect(2)
        .mount(&server)
        .await;

    let h = harness(client_for(&server), ScriptedPrompt::declining());
    let signer = Arc::new(MockWalletSigner::new("0xAA", "0xSIG"));
    let mut user = CurrentUser::with_address("0xAA");

    let first = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer.clone())
        .await;
    let second = h
        .coordinator
        .authenticate_user(Some(&mut user), false, signer)
        .await;

    assert!(!first);
    assert!(!second);
    // a fresh attempt ran each time, so the user was asked twice
    assert_eq!(h.prompt.confirmations().len(), 2);
}
