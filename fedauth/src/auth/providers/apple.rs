//! Sign in with Apple.
//!
//! Every attempt draws a fresh nonce, sends it with the authorization request
//! and insists the provider echoes the same value back before the identity
//! token is trusted. The nonce lives in an [`AppleAttempt`] owned by that one
//! call, so attempts never see each other's state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::facade::{ProviderAdapter, SignInFacade};
use crate::auth::federated::FederatedAuthClient;
use crate::auth::nonce::{Nonce, NonceGenerator};
use crate::auth::presentation::{PresentationAnchor, PresentationSurface};
use crate::auth::types::{ProviderCredential, ProviderKind, UnifiedUser};
use crate::config::NonceConfig;
use crate::error::{ProviderError, Result, SignInError};

/// Scopes an Apple ID request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppleScope {
    FullName,
    Email,
}

/// Authorization request handed to the Apple authorization service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppleIdRequest {
    /// Requested scopes.
    pub requested_scopes: Vec<AppleScope>,
    /// Raw nonce bound to this request.
    pub nonce: Nonce,
}

/// Apple ID credential returned on successful authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppleIdCredential {
    /// Apple's stable user identifier.
    pub user: String,
    /// JWT identity token as raw bytes.
    pub identity_token: Option<Vec<u8>>,
    /// Nonce Apple bound into the identity token.
    pub nonce: Option<String>,
}

/// Credential delivered by the Apple authorization service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppleAuthorization {
    /// The Apple ID credential this flow asks for.
    AppleId(AppleIdCredential),
    /// A saved keychain password; not usable for federated sign-in.
    Password { user: String },
}

/// Apple's native authorization flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppleAuthorizationService: Send + Sync {
    /// Presents Apple's sign-in UI over `anchor` and waits for the result.
    async fn perform(
        &self,
        request: AppleIdRequest,
        anchor: PresentationAnchor,
    ) -> std::result::Result<AppleAuthorization, ProviderError>;
}

/// User signed in through Apple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppleSignInUser {
    pub uid: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UnifiedUser> for AppleSignInUser {
    fn from(user: UnifiedUser) -> Self {
        Self {
            uid: user.uid,
            name: user.display_name,
            email: user.email,
        }
    }
}

/// State of one Apple sign-in attempt.
#[derive(Debug)]
pub struct AppleAttempt {
    nonce: Nonce,
}

impl AppleAttempt {
    /// Starts an attempt with a freshly generated nonce.
    #[must_use]
    pub fn begin(nonces: &NonceGenerator) -> Self {
        let nonce = nonces.generate();
        tracing::debug!(nonce_len = nonce.len(), "drew Apple sign-in nonce");
        Self { nonce }
    }

    /// Authorization request carrying this attempt's nonce.
    #[must_use]
    pub fn request(&self) -> AppleIdRequest {
        AppleIdRequest {
            requested_scopes: vec![AppleScope::FullName, AppleScope::Email],
            nonce: self.nonce.clone(),
        }
    }

    /// Validates the provider's answer and binds it to this attempt's nonce.
    ///
    /// # Errors
    ///
    /// - [`SignInError::AuthorizationFailed`] if the credential is not an Apple ID credential
    /// - [`SignInError::AuthenticationFailed`] if the identity token is missing or not
    ///   UTF-8, or the echoed nonce is absent or differs from this attempt's
    pub fn complete(self, authorization: AppleAuthorization) -> Result<ProviderCredential> {
        let AppleAuthorization::AppleId(credential) = authorization else {
            tracing::warn!("Apple returned a non Apple ID credential");
            return Err(SignInError::AuthorizationFailed);
        };

        let Some(token) = credential
            .identity_token
            .and_then(|bytes| String::from_utf8(bytes).ok())
        else {
            tracing::warn!("Apple credential has no readable identity token");
            return Err(SignInError::AuthenticationFailed);
        };

        if credential.nonce.as_deref() != Some(self.nonce.as_str()) {
            tracing::warn!("Apple credential nonce does not match this attempt");
            return Err(SignInError::AuthenticationFailed);
        }

        Ok(ProviderCredential::apple(token, self.nonce))
    }
}

/// Drives Sign in with Apple.
pub struct AppleAdapter {
    surface: Arc<dyn PresentationSurface>,
    service: Arc<dyn AppleAuthorizationService>,
    nonces: NonceGenerator,
}

impl AppleAdapter {
    /// Creates an adapter generating nonces from the OS random source.
    pub fn new(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn AppleAuthorizationService>,
    ) -> Self {
        Self::with_nonces(surface, service, NonceGenerator::new())
    }

    /// Creates an adapter with a custom nonce generator.
    pub fn with_nonces(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn AppleAuthorizationService>,
        nonces: NonceGenerator,
    ) -> Self {
        Self {
            surface,
            service,
            nonces,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AppleAdapter {
    type User = AppleSignInUser;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Apple
    }

    async fn obtain_credential(&self) -> Result<ProviderCredential> {
        let anchor = self
            .surface
            .current_anchor()
            .ok_or(SignInError::MissingRootScreen)?;

        let attempt = AppleAttempt::begin(&self.nonces);
        let authorization = self.service.perform(attempt.request(), anchor).await?;
        attempt.complete(authorization)
    }
}

/// Façade for Sign in with Apple.
pub type AppleSignIn = SignInFacade<AppleAdapter>;

impl AppleSignIn {
    /// Builds the Apple façade.
    pub fn apple(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn AppleAuthorizationService>,
        client: FederatedAuthClient,
    ) -> Self {
        Self::new(AppleAdapter::new(surface, service), client)
    }

    /// Builds the Apple façade drawing nonces of the configured length.
    pub fn with_nonce_config(
        surface: Arc<dyn PresentationSurface>,
        service: Arc<dyn AppleAuthorizationService>,
        client: FederatedAuthClient,
        config: &NonceConfig,
    ) -> Self {
        let nonces = NonceGenerator::new().with_length(config.length);
        Self::new(AppleAdapter::with_nonces(surface, service, nonces), client)
    }
}
