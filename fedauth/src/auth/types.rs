//! Credential and identity types shared by every provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::nonce::Nonce;

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Apple,
    Google,
    Facebook,
}

impl ProviderKind {
    /// Provider id understood by the identity backend.
    #[must_use]
    pub const fn provider_id(self) -> &'static str {
        match self {
            Self::Apple => "apple.com",
            Self::Google => "google.com",
            Self::Facebook => "facebook.com",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apple => write!(f, "apple"),
            Self::Google => write!(f, "google"),
            Self::Facebook => write!(f, "facebook"),
        }
    }
}

/// Provider-issued proof of identity, consumed once by the
/// [`FederatedAuthClient`](crate::auth::FederatedAuthClient).
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderCredential {
    /// Apple identity token bound to the raw nonce sent with the request.
    Apple { id_token: String, raw_nonce: Nonce },
    /// Google ID token plus OAuth access token.
    Google { id_token: String, access_token: String },
    /// Facebook access token.
    Facebook { access_token: String },
}

impl ProviderCredential {
    /// Builds an Apple credential.
    pub fn apple(id_token: impl Into<String>, raw_nonce: Nonce) -> Self {
        Self::Apple {
            id_token: id_token.into(),
            raw_nonce,
        }
    }

    /// Builds a Google credential.
    pub fn google(id_token: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::Google {
            id_token: id_token.into(),
            access_token: access_token.into(),
        }
    }

    /// Builds a Facebook credential.
    pub fn facebook(access_token: impl Into<String>) -> Self {
        Self::Facebook {
            access_token: access_token.into(),
        }
    }

    /// Provider that issued this credential.
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::Apple { .. } => ProviderKind::Apple,
            Self::Google { .. } => ProviderKind::Google,
            Self::Facebook { .. } => ProviderKind::Facebook,
        }
    }

    /// Form-encodes the credential as an identity-toolkit `postBody`.
    #[must_use]
    pub fn to_post_body(&self) -> String {
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        match self {
            Self::Apple {
                id_token,
                raw_nonce,
            } => {
                form.append_pair("id_token", id_token)
                    .append_pair("providerId", self.kind().provider_id())
                    .append_pair("nonce", raw_nonce.as_str());
            },
            Self::Google {
                id_token,
                access_token,
            } => {
                form.append_pair("id_token", id_token)
                    .append_pair("access_token", access_token)
                    .append_pair("providerId", self.kind().provider_id());
            },
            Self::Facebook { access_token } => {
                form.append_pair("access_token", access_token)
                    .append_pair("providerId", self.kind().provider_id());
            },
        }
        form.finish()
    }
}

impl std::fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("provider", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Provider-agnostic signed-in principal, as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedUser {
    /// Stable unique identifier.
    pub uid: String,
    /// Display name, if the backend knows one.
    pub display_name: Option<String>,
    /// Email address, if shared.
    pub email: Option<String>,
    /// Profile image, for providers that supply one.
    pub photo_url: Option<Url>,
}

impl UnifiedUser {
    /// Creates a user with only an identifier.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the profile image.
    #[must_use]
    pub fn with_photo_url(mut self, url: Url) -> Self {
        self.photo_url = Some(url);
        self
    }
}

/// Session returned by the identity backend after a credential exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSession {
    /// The signed-in user; `None` when the backend accepted the credential
    /// but did not resolve a user.
    pub user: Option<UnifiedUser>,
    /// Backend-issued ID token.
    pub id_token: Option<String>,
    /// Backend-issued refresh token.
    pub refresh_token: Option<String>,
    /// When the backend ID token expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// Session carrying only a user.
    #[must_use]
    pub fn for_user(user: UnifiedUser) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> Vec<(String, String)> {
        url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn provider_kind_names() {
        let names: Vec<_> = [ProviderKind::Apple, ProviderKind::Google, ProviderKind::Facebook]
            .into_iter()
            .map(|kind| (kind.to_string(), kind.provider_id()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("apple".to_string(), "apple.com"),
                ("google".to_string(), "google.com"),
                ("facebook".to_string(), "facebook.com"),
            ]
        );
    }

    #[test]
    fn apple_post_body_carries_token_and_nonce() {
        let credential = ProviderCredential::apple("tok.en", Nonce::from_issued("n-1._"));
        let pairs = decode(&credential.to_post_body());
        assert_eq!(
            pairs,
            vec![
                ("id_token".to_string(), "tok.en".to_string()),
                ("providerId".to_string(), "apple.com".to_string()),
                ("nonce".to_string(), "n-1._".to_string()),
            ]
        );
    }

    #[test]
    fn google_post_body_carries_both_tokens() {
        let credential = ProviderCredential::google("id", "access+token");
        let pairs = decode(&credential.to_post_body());
        assert!(pairs.contains(&("access_token".to_string(), "access+token".to_string())));
        assert!(pairs.contains(&("id_token".to_string(), "id".to_string())));
        assert!(pairs.contains(&("providerId".to_string(), "google.com".to_string())));
    }

    #[test]
    fn facebook_post_body_has_no_id_token() {
        let credential = ProviderCredential::facebook("fb");
        let pairs = decode(&credential.to_post_body());
        assert_eq!(pairs.len(), 2);
        assert_eq!(credential.kind(), ProviderKind::Facebook);
    }

    #[test]
    fn debug_redacts_tokens() {
        let credential = ProviderCredential::google("secret-id", "secret-access");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("Google"));
    }

    #[test]
    fn session_for_user_has_no_tokens() {
        let session = AuthSession::for_user(UnifiedUser::new("u1").with_email("a@b.com"));
        assert_eq!(session.user.as_ref().map(|u| u.uid.as_str()), Some("u1"));
        assert!(session.id_token.is_none());
    }
}
