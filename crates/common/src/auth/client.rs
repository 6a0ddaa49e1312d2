//! OAuth 2.0 client for the marketing platform token endpoint
//!
//! Handles:
//! - Authorization URL building
//! - Authorization code exchange (JSON body)
//! - Token refresh (form body)
//!
//! Every request is bounded by the client's timeout. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use super::traits::OAuthClientTrait;
use super::types::{ExchangeRequest, OAuthEndpoints, RefreshRequest, TokenResponse};

/// Error type for OAuth client operations
#[derive(Debug, Error)]
pub enum OAuthClientError {
    /// The provider answered with a non-success status
    #[error("OAuth provider returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The provider answered successfully but the body is not a token response
    #[error("Malformed token response: {reason}")]
    Malformed { reason: String },

    /// Network failure or timeout
    #[error("HTTP request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// OAuth 2.0 client bound to one provider's endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    endpoints: OAuthEndpoints,
    client: Client,
}

impl OAuthClient {
    /// Create a client whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(endpoints: OAuthEndpoints, timeout: Duration) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| OAuthClientError::Transport(format!("failed to build client: {e}")))?;

        Ok(Self { endpoints, client })
    }

    /// Create a client around an existing reqwest client.
    #[must_use]
    pub fn with_client(endpoints: OAuthEndpoints, client: Client) -> Self {
        Self { endpoints, client }
    }

    /// Build `{authorize_url}?client_id=...&redirect_uri=...`.
    #[must_use]
    pub fn authorization_url(&self, client_id: &str, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}",
            self.endpoints.authorize_url,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri)
        )
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// Returns error if:
    /// - The request fails or times out
    /// - The provider answers with a non-success status
    /// - The body is missing `access_token`, `refresh_token` or `expires_in`
    pub async fn exchange_code(
        &self,
        request: &ExchangeRequest,
    ) -> Result<TokenResponse, OAuthClientError> {
        let body = serde_json::json!({
            "client_id": request.client_id,
            "client_secret": request.client_secret,
            "code": request.code,
            "redirect_uri": request.redirect_uri,
        });

        debug!(endpoint = %self.endpoints.token_url, "exchanging authorization code");
        let builder = self.client.post(&self.endpoints.token_url).json(&body);
        self.execute(builder, |status| status.is_success()).await
    }

    /// Refresh the access token.
    ///
    /// # Errors
    /// Returns error if the request fails, the status is not 200, or the body
    /// is malformed
    pub async fn refresh_access_token(
        &self,
        request: &RefreshRequest,
    ) -> Result<TokenResponse, OAuthClientError> {
        let params = [
            ("client_id", request.client_id.as_str()),
            ("client_secret", request.client_secret.as_str()),
            ("refresh_token", request.refresh_token.as_str()),
        ];

        debug!(endpoint = %self.endpoints.token_url, "refreshing access token");
        let builder = self.client.post(&self.endpoints.token_url).form(&params);
        self.execute(builder, |status| status == StatusCode::OK).await
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        accept: impl Fn(StatusCode) -> bool,
    ) -> Result<TokenResponse, OAuthClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !accept(status) {
            warn!(status = status.as_u16(), "OAuth provider rejected token request");
            return Err(OAuthClientError::Rejected { status: status.as_u16(), body });
        }

        // Parsed once; a missing field is fatal.
        serde_json::from_str::<TokenResponse>(&body)
            .map_err(|e| OAuthClientError::Malformed { reason: e.to_string() })
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn authorization_url(&self, client_id: &str, redirect_uri: &str) -> String {
        self.authorization_url(client_id, redirect_uri)
    }

    async fn exchange_code(
        &self,
        request: &ExchangeRequest,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.exchange_code(request).await
    }

    async fn refresh_access_token(
        &self,
        request: &RefreshRequest,
    ) -> Result<TokenResponse, OAuthClientError> {
        self.refresh_access_token(request).await
    }
}
