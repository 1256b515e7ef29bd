//! End-to-end Sign in with Apple flow.
//!
//! Drives the Apple façade with a scripted authorization service against the
//! HTTP identity backend, served by wiremock. Verifies that the identity token
//! and the exact nonce drawn for the attempt reach the backend, and that the
//! backend's user comes back in the Apple user shape.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fedauth::auth::presentation::{PresentationAnchor, PresentationSurface};
use fedauth::auth::providers::{
    AppleAuthorization, AppleAuthorizationService, AppleIdCredential, AppleIdRequest,
};
use fedauth::backend::HttpIdentityBackend;
use fedauth::config::BackendConfig;
use fedauth::{AppleSignIn, AppleSignInUser, FederatedAuthClient, ProviderError, SignInError};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

struct MainWindow(Option<PresentationAnchor>);

impl PresentationSurface for MainWindow {
    fn current_anchor(&self) -> Option<PresentationAnchor> {
        self.0.clone()
    }
}

/// Answers every request with token `T`, echoing back the request's nonce
/// (or a fixed one when `echo` is off), and records the nonces it saw.
struct ScriptedApple {
    echo: bool,
    seen_nonces: Mutex<Vec<String>>,
}

impl ScriptedApple {
    fn new(echo: bool) -> Self {
        Self {
            echo,
            seen_nonces: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AppleAuthorizationService for ScriptedApple {
    async fn perform(
        &self,
        request: AppleIdRequest,
        _anchor: PresentationAnchor,
    ) -> Result<AppleAuthorization, ProviderError> {
        let nonce = request.nonce.as_str().to_string();
        self.seen_nonces.lock().unwrap().push(nonce.clone());

        Ok(AppleAuthorization::AppleId(AppleIdCredential {
            user: "001234.apple".to_string(),
            identity_token: Some(b"T".to_vec()),
            nonce: Some(if self.echo { nonce } else { "stale".to_string() }),
        }))
    }
}

fn post_body_of(request: &Request) -> Vec<(String, String)> {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let post_body = body["postBody"].as_str().unwrap().to_string();
    url::form_urlencoded::parse(post_body.as_bytes())
        .into_owned()
        .collect()
}

fn backend_for(server: &MockServer) -> FederatedAuthClient {
    let config = BackendConfig {
        base_url: Url::parse(&server.uri()).unwrap(),
        api_key: Some("test-key".to_string()),
        ..BackendConfig::default()
    };
    FederatedAuthClient::new(Arc::new(HttpIdentityBackend::new(&config).unwrap()))
}

#[tokio::test]
async fn apple_sign_in_reaches_backend_with_token_and_nonce() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithIdp"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "u1",
            "email": "a@b.com",
            "idToken": "backend-id",
            "expiresIn": "3600",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let apple = Arc::new(ScriptedApple::new(true));
    let facade = AppleSignIn::apple(
        Arc::new(MainWindow(Some(PresentationAnchor::new(1)))),
        apple.clone(),
        backend_for(&server),
    );

    let user = facade.sign_in().await.unwrap();
    assert_eq!(
        user,
        AppleSignInUser {
            uid: "u1".to_string(),
            name: None,
            email: Some("a@b.com".to_string()),
        }
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let pairs = post_body_of(&requests[0]);
    let nonce = apple.seen_nonces.lock().unwrap()[0].clone();
    assert_eq!(nonce.len(), 32);
    assert!(pairs.contains(&("id_token".to_string(), "T".to_string())));
    assert!(pairs.contains(&("providerId".to_string(), "apple.com".to_string())));
    assert!(pairs.contains(&("nonce".to_string(), nonce)));
}

#[tokio::test]
async fn stale_nonce_is_rejected_before_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let facade = AppleSignIn::apple(
        Arc::new(MainWindow(Some(PresentationAnchor::new(1)))),
        Arc::new(ScriptedApple::new(false)),
        backend_for(&server),
    );

    let err = facade.sign_in().await.unwrap_err();
    assert!(matches!(err, SignInError::AuthenticationFailed));
}

#[tokio::test]
async fn each_attempt_draws_a_new_nonce() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "localId": "u1",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let apple = Arc::new(ScriptedApple::new(true));
    let facade = AppleSignIn::apple(
        Arc::new(MainWindow(Some(PresentationAnchor::new(1)))),
        apple.clone(),
        backend_for(&server),
    );

    facade.sign_in().await.unwrap();
    facade.sign_in().await.unwrap();

    let seen = apple.seen_nonces.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0], seen[1]);
}

#[tokio::test]
async fn backend_without_user_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let facade = AppleSignIn::apple(
        Arc::new(MainWindow(Some(PresentationAnchor::new(1)))),
        Arc::new(ScriptedApple::new(true)),
        backend_for(&server),
    );

    let err = facade.sign_in().await.unwrap_err();
    assert_eq!(err.to_string(), "Authentication failed.");
}

#[tokio::test]
async fn no_window_means_no_request() {
    let server = MockServer::start().await;
    let apple = Arc::new(ScriptedApple::new(true));
    let facade = AppleSignIn::apple(Arc::new(MainWindow(None)), apple.clone(), backend_for(&server));

    let err = facade.sign_in().await.unwrap_err();
    assert!(matches!(err, SignInError::MissingRootScreen));
    assert!(apple.seen_nonces.lock().unwrap().is_empty());
}
