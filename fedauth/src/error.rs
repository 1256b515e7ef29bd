//! Error types and result aliases for fedauth.
//!
//! [`SignInError`] is the one closed taxonomy every façade reports through:
//! - local conditions each adapter recognises (missing surface, cancellation,
//!   malformed responses, missing configuration)
//! - passthrough of provider SDK and identity backend errors, unchanged
//!
//! Use [`is_user_canceled`](SignInError::is_user_canceled) to tell a user's
//! own dismissal apart from infrastructure failure.

use thiserror::Error;

use crate::auth::types::ProviderKind;
use crate::backend::BackendError;

/// Failure of a sign-in or sign-out attempt.
#[derive(Error, Debug)]
pub enum SignInError {
    /// No presentation surface was available; the provider flow never started.
    #[error("No active window is available to present the sign-in flow.")]
    MissingRootScreen,

    /// The user dismissed the provider's sign-in UI.
    #[error("Sign-in was canceled by the user.")]
    UserCanceled,

    /// The provider answered with an authorization of an unexpected shape.
    #[error("Authorization failed: the provider returned an unexpected credential type.")]
    AuthorizationFailed,

    /// Required token material was absent, the nonce did not match, or the
    /// identity backend accepted the credential but returned no user.
    #[error("Authentication failed.")]
    AuthenticationFailed,

    /// A setting the provider needs (e.g. the OAuth client ID) is not configured.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// The provider reported success but left out a token it must supply.
    #[error("The provider response is missing the {0}.")]
    IncompleteCredential(&'static str),

    /// Error raised by a provider SDK, surfaced unchanged.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Error raised by the identity backend, surfaced unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SignInError {
    /// Checks if the attempt ended because the user dismissed the flow.
    #[must_use]
    pub const fn is_user_canceled(&self) -> bool {
        matches!(self, Self::UserCanceled)
    }

    /// Checks if this error came straight from a provider SDK or the backend.
    #[must_use]
    pub const fn is_passthrough(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Backend(_))
    }
}

/// Raw error reported by a provider SDK.
///
/// `code` is the SDK's own numeric error code; adapters compare it against
/// the codes they recognise (see [`GOOGLE_CANCELED_CODE`](crate::auth::providers::google::GOOGLE_CANCELED_CODE)).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{provider} provider error {code}: {message}")]
pub struct ProviderError {
    /// Provider that raised the error.
    pub provider: ProviderKind,
    /// SDK-specific error code.
    pub code: i64,
    /// Human readable description from the SDK.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    pub fn new(provider: ProviderKind, code: i64, message: impl Into<String>) -> Self {
        Self {
            provider,
            code,
            message: message.into(),
        }
    }
}

/// Configuration loading and saving errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// General configuration error.
    #[error("Configuration error: {0}")]
    Invalid(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    Read(String),

    /// Failed to write configuration file.
    #[error("Failed to write configuration file: {0}. Check directory permissions.")]
    Write(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Read(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Write(format!("TOML serialize error: {err}"))
    }
}

/// Top-level error for the `fedauth` binary.
#[derive(Error, Debug)]
pub enum FedAuthError {
    /// Sign-in or credential exchange failed.
    #[error(transparent)]
    SignIn(#[from] SignInError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<BackendError> for FedAuthError {
    fn from(err: BackendError) -> Self {
        Self::SignIn(SignInError::Backend(err))
    }
}

/// Result type alias using [`SignInError`].
pub type Result<T> = std::result::Result<T, SignInError>;
