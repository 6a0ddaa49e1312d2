//! Traits for OAuth, credential storage and settings lookup
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (the OAuth provider, token persistence, process
//! environment).

use async_trait::async_trait;
use leadbridge_domain::{CredentialSet, OAuthClientConfig};
use thiserror::Error;

use super::client::OAuthClientError;
use super::types::{ExchangeRequest, RefreshRequest, TokenResponse};

/// Trait for OAuth provider operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Build the authorization URL the operator visits to grant access.
    fn authorization_url(&self, client_id: &str, redirect_uri: &str) -> String;

    /// Exchange an authorization code for tokens with a single POST.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or a body
    /// missing any token field.
    async fn exchange_code(&self, request: &ExchangeRequest)
        -> Result<TokenResponse, OAuthClientError>;

    /// Obtain a fresh token set from a refresh token.
    ///
    /// # Errors
    /// Returns error on transport failure, non-200 status, or malformed body.
    async fn refresh_access_token(
        &self,
        request: &RefreshRequest,
    ) -> Result<TokenResponse, OAuthClientError>;
}

/// Error type for credential store operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialStoreError {
    /// Backing storage could not be read
    #[error("failed to read credentials: {0}")]
    Read(String),

    /// Backing storage could not be written
    #[error("failed to write credentials: {0}")]
    Write(String),

    /// Stored record is not a credential set
    #[error("stored credentials are unreadable: {0}")]
    Corrupt(String),
}

/// Trait for credential set persistence
///
/// Implementations replace the whole record on every write; readers never
/// observe a partially updated set.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current credential set, if any.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be read
    async fn load(&self) -> Result<Option<CredentialSet>, CredentialStoreError>;

    /// Atomically replace the stored set.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    async fn replace(&self, credentials: CredentialSet) -> Result<(), CredentialStoreError>;
}

/// Source of OAuth client settings, consulted on every operation.
pub trait ClientConfigSource: Send + Sync {
    /// Snapshot of the current settings.
    fn oauth_client_config(&self) -> OAuthClientConfig;
}
