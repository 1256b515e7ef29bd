//! fedauth - federated sign-in façade.
//!
//! Signs a user in through Apple, Google or Facebook and exchanges the
//! provider credential for one provider-agnostic identity session. Provider
//! SDKs, the host window and the identity backend are collaborators behind
//! traits; [`backend::HttpIdentityBackend`] is a ready-made backend speaking
//! the identity-toolkit REST API.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;

pub use auth::providers::{
    AppleSignIn, AppleSignInUser, FacebookSignIn, FacebookSignInUser, GoogleSignIn,
    GoogleSignInUser,
};
pub use auth::{FederatedAuthClient, Nonce, NonceGenerator, ProviderCredential, ProviderKind, UnifiedUser};
pub use error::{ProviderError, Result, SignInError};
