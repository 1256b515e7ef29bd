//! Identity backend integration.
//!
//! The backend is the only place a provider credential turns into a unified
//! session. This module provides:
//! - [`IdentityBackend`] - Trait for the backend's sign-in and sign-out primitives
//! - [`HttpIdentityBackend`] - Identity-toolkit REST implementation

pub mod error;
pub mod middleware;
pub mod rest;

use async_trait::async_trait;

use crate::auth::types::{AuthSession, ProviderCredential};

pub use error::BackendError;
pub use rest::HttpIdentityBackend;

/// Sign-in and sign-out primitives of the identity backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Exchanges a provider credential for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credential or cannot be reached.
    async fn sign_in_with_credential(
        &self,
        credential: &ProviderCredential,
    ) -> Result<AuthSession, BackendError>;

    /// Ends the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be ended.
    async fn sign_out(&self) -> Result<(), BackendError>;
}
