//! Google Sign-In.
//!
//! Google's SDK handles nonce protection itself, so this adapter only checks
//! its preconditions, classifies cancellation and demands both tokens.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::auth::facade::{ProviderAdapter, SignInFacade};
use crate::auth::federated::FederatedAuthClient;
use crate::auth::presentation::{PresentationAnchor, PresentationSurface};
use crate::auth::types::{ProviderCredential, ProviderKind, UnifiedUser};
use crate::error::{ProviderError, Result, SignInError};

/// SDK error code reported when the user dismisses the Google sign-in sheet.
pub const GOOGLE_CANCELED_CODE: i64 = -5;

/// Tokens Google returns on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoogleSignInResult {
    /// OpenID Connect ID token.
    pub id_token: Option<String>,
    /// OAuth access token.
    pub access_token: Option<String>,
}

/// Google's hosted sign-in flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleSignInService: Send + Sync {
    /// Presents Google sign-in for the OAuth client `client_id` over `anchor`.
    async fn sign_in(
        &self,
        client_id: String,
        anchor: PresentationAnchor,
    ) -> std::result::Result<GoogleSignInResult, ProviderError>;
}

/// User signed in through Google.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleSignInUser {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<Url>,
}

impl From<UnifiedUser> for GoogleSignInUser {
    fn from(user: UnifiedUser) -> Self {
        Self {
            uid: user.uid,
            name: user.display_name,
            email: user.email,
            photo_url: user.photo_url,
        }
    }
}

/// Drives Google Sign-In.
pub struct GoogleAdapter {
    surface: Arc<dyn PresentationSurface>,
    service: Arc<dyn GoogleSignInService>,
    client_id: Option<String>,
}

impl GoogleAdapter {
    /// Creates an adapter for the OAuth client `client_id`.
    pub fn new(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn GoogleSignInService>,
        client_id: Option<String>,
    ) -> Self {
        Self {
            surface,
            service,
            client_id,
        }
    }
}

fn classify(err: ProviderError) -> SignInError {
    if err.code == GOOGLE_CANCELED_CODE {
        SignInError::UserCanceled
    } else {
        SignInError::Provider(err)
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    type User = GoogleSignInUser;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn obtain_credential(&self) -> Result<ProviderCredential> {
        let anchor = self
            .surface
            .current_anchor()
            .ok_or(SignInError::MissingRootScreen)?;

        let client_id = self.client_id.clone().ok_or_else(|| {
            SignInError::MissingConfiguration("Google OAuth client ID is not set".to_string())
        })?;

        let result = self
            .service
            .sign_in(client_id, anchor)
            .await
            .map_err(classify)?;

        let id_token = result
            .id_token
            .ok_or(SignInError::IncompleteCredential("ID token"))?;
        let access_token = result
            .access_token
            .ok_or(SignInError::IncompleteCredential("access token"))?;

        Ok(ProviderCredential::google(id_token, access_token))
    }
}

/// Façade for Google Sign-In.
pub type GoogleSignIn = SignInFacade<GoogleAdapter>;

impl GoogleSignIn {
    /// Builds the Google façade.
    pub fn google(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn GoogleSignInService>,
        client_id: Option<String>,
        client: FederatedAuthClient,
    ) -> Self {
        Self::new(GoogleAdapter::new(surface, service, client_id), client)
    }
}
