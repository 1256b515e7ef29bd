//! Facebook Login.
//!
//! The Facebook SDK reports a login as an optional result (with a cancelled
//! flag and an optional token) next to an optional error, and nothing stops
//! several of these from being set at once. [`FacebookLoginOutcome`] folds
//! them into one answer with a fixed precedence: error, then cancellation,
//! then token.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::auth::facade::{ProviderAdapter, SignInFacade};
use crate::auth::federated::FederatedAuthClient;
use crate::auth::presentation::{PresentationAnchor, PresentationSurface};
use crate::auth::types::{ProviderCredential, ProviderKind, UnifiedUser};
use crate::error::{ProviderError, Result, SignInError};

/// Permissions requested on every login.
pub const FACEBOOK_PERMISSIONS: [&str; 2] = ["public_profile", "email"];

/// Result half of a Facebook login callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacebookLoginResult {
    /// Access token string, present on success.
    pub token: Option<String>,
    /// Set when the user backed out of the login dialog.
    pub is_cancelled: bool,
}

/// Raw Facebook login callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacebookLoginResponse {
    pub result: Option<FacebookLoginResult>,
    pub error: Option<ProviderError>,
}

/// A Facebook login callback reduced to the one outcome that counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacebookLoginOutcome {
    /// The SDK reported an error.
    Failed(ProviderError),
    /// The user canceled.
    Canceled,
    /// The user logged in and a token was issued.
    Authorized { access_token: String },
    /// No error, no cancellation, no token.
    Empty,
}

impl From<FacebookLoginResponse> for FacebookLoginOutcome {
    fn from(response: FacebookLoginResponse) -> Self {
        if let Some(err) = response.error {
            return Self::Failed(err);
        }
        match response.result {
            Some(result) if result.is_cancelled => Self::Canceled,
            Some(FacebookLoginResult {
                token: Some(access_token),
                ..
            }) => Self::Authorized { access_token },
            _ => Self::Empty,
        }
    }
}

/// Facebook's native login manager.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacebookLoginService: Send + Sync {
    /// Presents Facebook login over `anchor`, requesting `permissions`.
    async fn log_in(
        &self,
        permissions: Vec<String>,
        anchor: PresentationAnchor,
    ) -> FacebookLoginResponse;

    /// Clears the SDK's own access token.
    fn log_out(&self);
}

/// User signed in through Facebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacebookSignInUser {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_image_url: Option<Url>,
}

impl From<UnifiedUser> for FacebookSignInUser {
    fn from(user: UnifiedUser) -> Self {
        Self {
            uid: user.uid,
            name: user.display_name,
            email: user.email,
            profile_image_url: user.photo_url,
        }
    }
}

/// Drives Facebook Login.
pub struct FacebookAdapter {
    surface: Arc<dyn PresentationSurface>,
    service: Arc<dyn FacebookLoginService>,
}

impl FacebookAdapter {
    /// Creates a Facebook adapter.
    pub fn new(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn FacebookLoginService>,
    ) -> Self {
        Self { surface, service }
    }
}

#[async_trait]
impl ProviderAdapter for FacebookAdapter {
    type User = FacebookSignInUser;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Facebook
    }

    async fn obtain_credential(&self) -> Result<ProviderCredential> {
        let anchor = self
            .surface
            .current_anchor()
            .ok_or(SignInError::MissingRootScreen)?;

        let permissions = FACEBOOK_PERMISSIONS.iter().map(ToString::to_string).collect();
        let response = self.service.log_in(permissions, anchor).await;

        match FacebookLoginOutcome::from(response) {
            FacebookLoginOutcome::Failed(err) => Err(SignInError::Provider(err)),
            FacebookLoginOutcome::Canceled => Err(SignInError::UserCanceled),
            FacebookLoginOutcome::Authorized { access_token } => {
                Ok(ProviderCredential::facebook(access_token))
            },
            FacebookLoginOutcome::Empty => Err(SignInError::IncompleteCredential("access token")),
        }
    }

    async fn end_session(&self) -> Result<()> {
        self.service.log_out();
        tracing::debug!("cleared Facebook SDK session");
        Ok(())
    }
}

/// Façade for Facebook Login.
pub type FacebookSignIn = SignInFacade<FacebookAdapter>;

impl FacebookSignIn {
    /// Builds the Facebook façade.
    pub fn facebook(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn FacebookLoginService>,
        client: FederatedAuthClient,
    ) -> Self {
        Self::new(FacebookAdapter::new(surface, service), client)
    }
}
