//! Exchange of provider credentials for a unified identity.

use std::sync::Arc;

use crate::auth::types::{ProviderCredential, UnifiedUser};
use crate::backend::IdentityBackend;
use crate::error::{Result, SignInError};

/// The single component that talks to the identity backend.
///
/// Shared by every façade; clone it to hand the same backend to several
/// providers.
#[derive(Clone)]
pub struct FederatedAuthClient {
    backend: Arc<dyn IdentityBackend>,
}

impl FederatedAuthClient {
    /// Creates a client over the given backend.
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Exchanges `credential` for the backend's unified user.
    ///
    /// Backend errors are returned unchanged. A successful response without
    /// a user becomes [`SignInError::AuthenticationFailed`]. The exchange is
    /// attempted exactly once.
    pub async fn exchange(&self, credential: ProviderCredential) -> Result<UnifiedUser> {
        let provider = credential.kind();
        let session = self.backend.sign_in_with_credential(&credential).await?;

        let Some(user) = session.user else {
            tracing::warn!(%provider, "identity backend accepted credential but returned no user");
            return Err(SignInError::AuthenticationFailed);
        };

        tracing::info!(%provider, uid = %user.uid, "signed in");
        Ok(user)
    }

    /// Signs out of the identity backend.
    pub async fn sign_out(&self) -> Result<()> {
        self.backend.sign_out().await?;
        tracing::info!("signed out");
        Ok(())
    }
}
