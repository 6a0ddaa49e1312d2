//! OAuth 2.0 types and structures
//!
//! Endpoint configuration, the provider's token response, and the values the
//! token manager reports back to callers.

use chrono::{DateTime, Utc};
use leadbridge_domain::constants::{
    DEFAULT_OAUTH_BASE_URL, OAUTH_AUTHORIZE_PATH, OAUTH_TOKEN_PATH,
};
use leadbridge_domain::CredentialSet;
use serde::{Deserialize, Serialize};

use super::client::OAuthClientError;

/// Authorization and token endpoints of the marketing platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub authorize_url: String,
    pub token_url: String,
}

impl OAuthEndpoints {
    /// Derive both endpoints from a base URL such as `https://api.rd.services`.
    #[must_use]
    pub fn from_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            authorize_url: format!("{base}{OAUTH_AUTHORIZE_PATH}"),
            token_url: format!("{base}{OAUTH_TOKEN_PATH}"),
        }
    }
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self::from_base_url(DEFAULT_OAUTH_BASE_URL)
    }
}

/// Token response from `/auth/token`.
///
/// Every field is required: a body missing any of them is a malformed
/// response and must never produce a partial credential set.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl TokenResponse {
    /// Build the credential set this response describes.
    ///
    /// # Errors
    /// Returns `Malformed` if `expires_in` does not yield a representable
    /// expiry.
    pub fn into_credentials(
        self,
        issued_at: DateTime<Utc>,
    ) -> Result<CredentialSet, OAuthClientError> {
        let expires_in = self.expires_in;
        CredentialSet::issued(self.access_token, self.refresh_token, expires_in, issued_at)
            .ok_or_else(|| OAuthClientError::Malformed {
                reason: format!("expires_in out of range: {expires_in}"),
            })
    }
}

/// Client settings required by the code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub code: String,
}

/// Client settings required by the refresh grant.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Result of `check_or_initiate_authorization`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    /// A stored, unexpired credential set exists.
    AlreadyValid { expires_at: DateTime<Utc> },
    /// The operator must visit `url` to grant access.
    AuthorizationRequired { url: String },
}

/// Lifecycle state of the stored credential set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CredentialState {
    NoCredential,
    /// An authorization URL was issued and no exchange has completed since.
    Pending { since: DateTime<Utc> },
    Valid { expires_at: DateTime<Utc> },
    Expired { expired_at: DateTime<Utc> },
}
