//! Application configuration settings.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::nonce::DEFAULT_NONCE_LENGTH;

/// Main configuration for fedauth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FedAuthConfig {
    /// Identity backend settings.
    pub backend: BackendConfig,
    /// Google sign-in settings.
    pub google: GoogleConfig,
    /// Nonce settings.
    pub nonce: NonceConfig,
}

/// Identity backend client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Identity backend base URL.
    pub base_url: Url,
    /// API key appended to every backend request.
    pub api_key: Option<String>,
    /// Redirect URI reported to the backend with each credential.
    pub request_uri: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://identitytoolkit.googleapis.com").expect("valid default URL"),
            api_key: None,
            request_uri: Url::parse("http://localhost").expect("valid default URL"),
            timeout_secs: 30,
        }
    }
}

/// Google sign-in configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// OAuth client ID of this application.
    pub client_id: Option<String>,
}

/// Nonce generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NonceConfig {
    /// Characters per nonce.
    pub length: NonZeroUsize,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_NONCE_LENGTH,
        }
    }
}

/// Environment variables that can override configuration.
pub mod env {
    pub const BACKEND_URL: &str = "FEDAUTH_BACKEND_URL";
    pub const API_KEY: &str = "FEDAUTH_API_KEY";
    pub const GOOGLE_CLIENT_ID: &str = "FEDAUTH_GOOGLE_CLIENT_ID";
    pub const LOG_LEVEL: &str = "FEDAUTH_LOG";
}

impl FedAuthConfig {
    /// Apply environment variable overrides to the configuration.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(env::BACKEND_URL) {
            match Url::parse(&url) {
                Ok(parsed) => self.backend.base_url = parsed,
                Err(e) => tracing::warn!("ignoring invalid {}: {e}", env::BACKEND_URL),
            }
        }

        if let Some(key) = lookup(env::API_KEY) {
            self.backend.api_key = Some(key);
        }

        if let Some(client_id) = lookup(env::GOOGLE_CLIENT_ID) {
            self.google.client_id = Some(client_id);
        }

        self
    }

    /// API key with all but the last four characters masked.
    #[must_use]
    pub fn masked_api_key(&self) -> Option<String> {
        self.backend.api_key.as_ref().map(|key| {
            let visible = key.len().saturating_sub(4);
            let tail = key.get(visible..).unwrap_or_default();
            format!("{}{tail}", "*".repeat(visible))
        })
    }
}
