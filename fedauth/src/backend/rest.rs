//! Identity-toolkit REST client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use crate::auth::types::{AuthSession, ProviderCredential, UnifiedUser};
use crate::backend::middleware::ApiKeyMiddleware;
use crate::backend::{BackendError, IdentityBackend};
use crate::config::BackendConfig;

const SIGN_IN_WITH_IDP_PATH: &str = "v1/accounts:signInWithIdp";

/// Identity backend speaking the identity-toolkit `signInWithIdp` API.
///
/// The signed-in session is kept in memory only; [`sign_out`](IdentityBackend::sign_out)
/// drops it without a network round-trip.
pub struct HttpIdentityBackend {
    client: ClientWithMiddleware,
    endpoint: Url,
    request_uri: Url,
    session: Arc<RwLock<Option<AuthSession>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithIdpResponse {
    local_id: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl SignInWithIdpResponse {
    fn into_session(self) -> AuthSession {
        let user = self
            .local_id
            .filter(|uid| !uid.is_empty())
            .map(|uid| UnifiedUser {
                uid,
                display_name: self.display_name,
                email: self.email,
                photo_url: self.photo_url.and_then(|u| Url::parse(&u).ok()),
            });

        let expires_at = self.expires_in.as_deref().and_then(expiry_from);

        AuthSession {
            user,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

/// Absolute expiry for a relative `expiresIn` value. Unparsable or
/// out-of-range values yield `None`.
fn expiry_from(expires_in: &str) -> Option<DateTime<Utc>> {
    let expiry = expires_in
        .parse::<i64>()
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl));

    if expiry.is_none() {
        tracing::warn!(expires_in, "ignoring unusable session expiry from identity backend");
    }
    expiry
}

/// Endpoint under `base`, keeping any path prefix `base` carries.
fn endpoint_url(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(SIGN_IN_WITH_IDP_PATH)
}

impl HttpIdentityBackend {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let inner_client = Client::builder()
            .user_agent(format!("fedauth/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let client = ClientBuilder::new(inner_client)
            .with(ApiKeyMiddleware::new(config.api_key.clone()))
            .build();

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.base_url)?,
            request_uri: config.request_uri.clone(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Currently signed-in session, if any.
    pub async fn current_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    /// Checks if a user is signed in.
    pub async fn is_signed_in(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.user.is_some())
    }
}

#[async_trait]
impl IdentityBackend for HttpIdentityBackend {
    async fn sign_in_with_credential(
        &self,
        credential: &ProviderCredential,
    ) -> Result<AuthSession, BackendError> {
        let body = serde_json::json!({
            "postBody": credential.to_post_body(),
            "requestUri": self.request_uri.as_str(),
            "returnIdpCredential": true,
            "returnSecureToken": true,
        });

        tracing::debug!(provider = %credential.kind(), "submitting credential to identity backend");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(&body)?)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map_or(text, |envelope| envelope.error.message);
            tracing::warn!(status, %message, "identity backend rejected credential");
            return Err(BackendError::Api { status, message });
        }

        let data: SignInWithIdpResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Serialization(e.to_string()))?;

        let session = data.into_session();
        if session.user.is_some() {
            *self.session.write().await = Some(session.clone());
        }

        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.session.write().await.take().is_some() {
            tracing::debug!("cleared identity backend session");
        }
        Ok(())
    }
}
