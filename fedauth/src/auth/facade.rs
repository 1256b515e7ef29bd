//! The uniform sign-in contract shared by every provider.
//!
//! A [`SignInFacade`] pairs one [`ProviderAdapter`] with the shared
//! [`FederatedAuthClient`]:
//!
//! 1. the adapter runs its provider's native flow and yields a [`ProviderCredential`]
//! 2. the client exchanges it with the identity backend
//! 3. the resulting [`UnifiedUser`] is projected into the provider's user shape
//!
//! Every attempt resolves exactly once: the returned future completes with
//! either a user or a [`SignInError`].

use async_trait::async_trait;

use crate::auth::federated::FederatedAuthClient;
use crate::auth::types::{ProviderCredential, ProviderKind, UnifiedUser};
use crate::error::{Result, SignInError};

/// One provider's native sign-in flow.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider-specific view of the signed-in user.
    type User: From<UnifiedUser> + Send;

    /// Provider this adapter drives.
    fn kind(&self) -> ProviderKind;

    /// Runs the provider flow and normalises its result into a credential.
    ///
    /// # Errors
    ///
    /// Returns the adapter's own error kinds where it recognises the failure,
    /// otherwise the provider's error unchanged.
    async fn obtain_credential(&self) -> Result<ProviderCredential>;

    /// Clears any session the provider keeps of its own. Called after the
    /// identity backend signed out successfully.
    async fn end_session(&self) -> Result<()> {
        Ok(())
    }
}

/// Per-provider sign-in entry point.
pub struct SignInFacade<A> {
    adapter: A,
    client: FederatedAuthClient,
}

impl<A: ProviderAdapter> SignInFacade<A> {
    /// Creates a façade over `adapter`, exchanging credentials through `client`.
    pub const fn new(adapter: A, client: FederatedAuthClient) -> Self {
        Self { adapter, client }
    }

    /// Provider behind this façade.
    pub fn kind(&self) -> ProviderKind {
        self.adapter.kind()
    }

    /// Signs the user in with this provider.
    ///
    /// Each call is an independent attempt with its own state; concurrent
    /// calls on one façade do not interfere.
    pub async fn sign_in(&self) -> Result<A::User> {
        let provider = self.adapter.kind();
        tracing::debug!(%provider, "sign-in attempt started");

        let credential = match self.adapter.obtain_credential().await {
            Ok(credential) => credential,
            Err(SignInError::UserCanceled) => {
                tracing::info!(%provider, "sign-in canceled by user");
                return Err(SignInError::UserCanceled);
            },
            Err(e) => {
                tracing::warn!(%provider, "provider sign-in failed: {e}");
                return Err(e);
            },
        };

        let user = self.client.exchange(credential).await?;
        Ok(user.into())
    }

    /// Signs out of the identity backend, then ends the provider's own session.
    ///
    /// If the backend sign-out fails the provider session is left untouched.
    pub async fn sign_out(&self) -> Result<()> {
        self.client.sign_out().await?;
        self.adapter.end_session().await
    }
}
