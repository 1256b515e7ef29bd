//! Federated sign-in for fedauth.
//!
//! This module turns the Apple, Google and Facebook sign-in flows into one
//! contract: [`SignInFacade::sign_in`] yields a provider-shaped user or a
//! [`SignInError`](crate::error::SignInError), and every credential is
//! exchanged through the shared [`FederatedAuthClient`].

pub mod facade;
pub mod federated;
pub mod nonce;
pub mod presentation;
pub mod providers;
pub mod types;

pub use facade::{ProviderAdapter, SignInFacade};
pub use federated::FederatedAuthClient;
pub use nonce::{generate_nonce, EntropySource, Nonce, NonceGenerator, OsEntropy};
pub use presentation::{PresentationAnchor, PresentationSurface};
pub use types::{AuthSession, ProviderCredential, ProviderKind, UnifiedUser};
