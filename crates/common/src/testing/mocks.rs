//! Mock implementations of the auth traits
//!
//! Provides scripted provider clients and fixed settings for testing.

// Test mocks keep error handling minimal; failures surface as test panics.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use leadbridge_domain::OAuthClientConfig;
use parking_lot::Mutex;

use crate::auth::{
    ClientConfigSource, ExchangeRequest, OAuthClientError, OAuthClientTrait, OAuthEndpoints,
    RefreshRequest, TokenResponse,
};

/// Scripted answer for a mock provider call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Tokens(TokenResponse),
    Rejected(u16, String),
    Malformed(String),
    Transport(String),
}

impl MockOutcome {
    fn into_result(self) -> Result<TokenResponse, OAuthClientError> {
        match self {
            Self::Tokens(tokens) => Ok(tokens),
            Self::Rejected(status, body) => Err(OAuthClientError::Rejected { status, body }),
            Self::Malformed(reason) => Err(OAuthClientError::Malformed { reason }),
            Self::Transport(message) => Err(OAuthClientError::Transport(message)),
        }
    }
}

impl Default for MockOutcome {
    fn default() -> Self {
        Self::Tokens(TokenResponse {
            access_token: "mock-access".to_string(),
            refresh_token: "mock-refresh".to_string(),
            expires_in: 86_400,
        })
    }
}

/// Mock OAuth provider client
///
/// Clones share state, so a test can keep a handle after moving the client
/// into a token manager.
///
/// # Examples
///
/// ```
/// use leadbridge_common::testing::{MockOAuthClient, MockOutcome};
///
/// let client = MockOAuthClient::new();
/// client.set_refresh(MockOutcome::Rejected(401, "invalid_grant".into()));
/// assert_eq!(client.refresh_calls(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockOAuthClient {
    endpoints: OAuthEndpoints,
    exchange: Arc<Mutex<MockOutcome>>,
    refresh: Arc<Mutex<MockOutcome>>,
    exchange_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    last_code: Arc<Mutex<Option<String>>>,
    last_refresh_token: Arc<Mutex<Option<String>>>,
}

impl MockOAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_exchange(&self, outcome: MockOutcome) {
        *self.exchange.lock() = outcome;
    }

    pub fn set_refresh(&self, outcome: MockOutcome) {
        *self.refresh.lock() = outcome;
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Provider calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.exchange_calls() + self.refresh_calls()
    }

    pub fn last_code(&self) -> Option<String> {
        self.last_code.lock().clone()
    }

    pub fn last_refresh_token(&self) -> Option<String> {
        self.last_refresh_token.lock().clone()
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    fn authorization_url(&self, client_id: &str, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}",
            self.endpoints.authorize_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri)
        )
    }

    async fn exchange_code(
        &self,
        request: &ExchangeRequest,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_code.lock() = Some(request.code.clone());
        self.exchange.lock().clone().into_result()
    }

    async fn refresh_access_token(
        &self,
        request: &RefreshRequest,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refresh_token.lock() = Some(request.refresh_token.clone());
        self.refresh.lock().clone().into_result()
    }
}

/// Client settings held in memory, mutable between calls.
#[derive(Debug, Default)]
pub struct StaticClientConfig {
    config: Mutex<OAuthClientConfig>,
}

impl StaticClientConfig {
    pub fn new(config: OAuthClientConfig) -> Self {
        Self { config: Mutex::new(config) }
    }

    /// Every setting present except the seeded refresh token.
    pub fn complete() -> Self {
        Self::new(OAuthClientConfig {
            client_id: Some("test-client".to_string()),
            client_secret: Some("test-secret".to_string()),
            redirect_uri: Some("http://localhost:8000/oauth/callback".to_string()),
            refresh_token: None,
        })
    }

    pub fn update(&self, change: impl FnOnce(&mut OAuthClientConfig)) {
        change(&mut self.config.lock());
    }
}

impl ClientConfigSource for StaticClientConfig {
    fn oauth_client_config(&self) -> OAuthClientConfig {
        self.config.lock().clone()
    }
}
