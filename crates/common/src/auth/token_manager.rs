//! Token manager for the marketing platform credential set
//!
//! Manages the OAuth credential lifecycle:
//! - Authorization URL issuance when no valid set is stored
//! - Authorization code exchange
//! - Refresh-token grant
//! - Lazy expiry checks on access (no background timer)
//!
//! ```text
//! NoCredential ──authorize──► Pending ──callback──► Valid
//!       ▲                        ▲                    │ expires_at <= now
//!       │                        └──authorize─────────┤
//!       └── refresh rejected / no refresh token ── Expired ──refresh──► Valid
//! ```
//!
//! Exchange and refresh are serialised behind one async mutex so concurrent
//! callbacks cannot interleave their writes. The store always receives a
//! whole credential set.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use leadbridge_domain::{BridgeError, CredentialSet, OAuthClientConfig};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::client::OAuthClientError;
use super::traits::{ClientConfigSource, CredentialStore, CredentialStoreError, OAuthClientTrait};
use super::types::{AuthorizationOutcome, CredentialState, ExchangeRequest, RefreshRequest};
use crate::time::{Clock, SystemClock};

/// Error type for token manager operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenManagerError {
    /// Required client setting or callback code is absent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Code exchange rejected (`status` set) or answered with a malformed body
    #[error("Token exchange failed (status {status:?}): {body}")]
    Exchange { status: Option<u16>, body: String },

    /// Refresh rejected (`status` set) or answered with a malformed body
    #[error("Token refresh failed (status {status:?}): {body}")]
    Refresh { status: Option<u16>, body: String },

    /// No refresh token available
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Stored credential set is past `expires_at`
    #[error("Stored credential set expired")]
    Expired,

    /// Network failure or timeout talking to the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credential store failure
    #[error("Credential store error: {0}")]
    Store(#[from] CredentialStoreError),
}

impl From<TokenManagerError> for BridgeError {
    fn from(err: TokenManagerError) -> Self {
        match err {
            TokenManagerError::Configuration(message) => Self::Configuration { message },
            TokenManagerError::Exchange { status, body } => Self::Exchange { status, body },
            TokenManagerError::Refresh { status, body } => Self::Refresh { status, body },
            TokenManagerError::MissingCredential(message) => Self::MissingCredential { message },
            TokenManagerError::Expired => Self::Expired,
            TokenManagerError::Transport(message) => Self::Transport { position: None, message },
            TokenManagerError::Store(err) => Self::storage(err.to_string()),
        }
    }
}

/// Authorization progress that the store does not record.
#[derive(Debug, Clone, Copy, Default)]
struct FlowState {
    /// When the last authorization URL was issued, until an exchange lands.
    pending_since: Option<DateTime<Utc>>,
    /// The refresh grant failed terminally; only a new authorization helps.
    reauthorization_required: bool,
}

/// Owner of the marketing platform credential set.
pub struct TokenManager<C: OAuthClientTrait + 'static, S: CredentialStore + ?Sized + 'static> {
    oauth_client: Arc<C>,
    store: Arc<S>,
    config_source: Arc<dyn ClientConfigSource>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
    flow: parking_lot::Mutex<FlowState>,
    persist_callback_tokens: bool,
}

impl<C: OAuthClientTrait + 'static, S: CredentialStore + ?Sized + 'static> TokenManager<C, S> {
    /// Create a token manager using the system clock.
    ///
    /// # Arguments
    /// * `oauth_client` - Provider client for exchange and refresh
    /// * `store` - Credential persistence, exclusively written by this manager
    /// * `config_source` - Client settings, re-read on every operation
    #[must_use]
    pub fn new(
        oauth_client: C,
        store: Arc<S>,
        config_source: Arc<dyn ClientConfigSource>,
    ) -> Self {
        Self {
            oauth_client: Arc::new(oauth_client),
            store,
            config_source,
            clock: Arc::new(SystemClock),
            write_lock: Mutex::new(()),
            flow: parking_lot::Mutex::new(FlowState::default()),
            persist_callback_tokens: true,
        }
    }

    /// Replace the system clock, typically with a `MockClock` in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Choose whether a successful callback stores the exchanged set.
    #[must_use]
    pub fn persist_callback_tokens(mut self, persist: bool) -> Self {
        self.persist_callback_tokens = persist;
        self
    }

    /// Return "already valid" for an unexpired set, otherwise build the
    /// authorization URL the operator must visit.
    ///
    /// # Errors
    /// Returns `Configuration` if `client_id` or `redirect_uri` is missing.
    #[instrument(skip(self))]
    pub async fn check_or_initiate_authorization(
        &self,
    ) -> Result<AuthorizationOutcome, TokenManagerError> {
        let now = self.clock.now();
        if let Some(current) = self.load().await? {
            if !current.is_expired_at(now) {
                debug!(expires_at = %current.expires_at, "credential set still valid");
                return Ok(AuthorizationOutcome::AlreadyValid { expires_at: current.expires_at });
            }
            info!(expired_at = %current.expires_at, "credential set expired");
        }

        let config = self.config_source.oauth_client_config();
        let client_id = required(config.client_id, "client_id")?;
        let redirect_uri = required(config.redirect_uri, "redirect_uri")?;

        let url = self.oauth_client.authorization_url(&client_id, &redirect_uri);
        self.flow.lock().pending_since = Some(now);

        info!(authorization_url = %url, "authorization required; visit the URL to grant access");
        Ok(AuthorizationOutcome::AuthorizationRequired { url })
    }

    /// Exchange the authorization code delivered by the provider redirect.
    ///
    /// On success the full credential set replaces whatever was stored (unless
    /// callback persistence is disabled). On any failure the store is left
    /// untouched.
    ///
    /// # Errors
    /// Returns error if:
    /// - `client_id`, `client_secret`, `redirect_uri` or `code` is missing
    /// - The provider rejects the exchange or returns a malformed body
    /// - The request fails or times out
    /// - The store cannot be written
    #[instrument(skip(self, code))]
    pub async fn handle_authorization_callback(
        &self,
        code: &str,
    ) -> Result<CredentialSet, TokenManagerError> {
        let config = self.config_source.oauth_client_config();
        let request = ExchangeRequest {
            client_id: required(config.client_id, "client_id")?,
            client_secret: required(config.client_secret, "client_secret")?,
            redirect_uri: required(config.redirect_uri, "redirect_uri")?,
            code: required(Some(code.to_string()), "code")?,
        };

        let _guard = self.write_lock.lock().await;

        let credentials = self
            .oauth_client
            .exchange_code(&request)
            .await
            .and_then(|response| response.into_credentials(self.clock.now()))
            .map_err(exchange_error)?;

        if self.persist_callback_tokens {
            self.store.replace(credentials.clone()).await?;
            info!(expires_at = %credentials.expires_at, "authorization code exchanged and stored");
        } else {
            warn!(
                expires_at = %credentials.expires_at,
                "authorization code exchanged but callback persistence is disabled"
            );
        }

        *self.flow.lock() = FlowState::default();
        Ok(credentials)
    }

    /// Replace the credential set using the refresh-token grant.
    ///
    /// The refresh token comes from the stored set, or from the operator
    /// seeded `refresh_token` setting when the store has none. Failures never
    /// clear stored credentials. A missing or rejected refresh token leaves
    /// the manager requiring re-authorization, reported as `NoCredential`
    /// once the stored set has expired.
    ///
    /// # Errors
    /// Returns error if:
    /// - No refresh token is available (`MissingCredential`, no network call)
    /// - `client_id` or `client_secret` is missing
    /// - The provider answers with anything but 200 and a complete body
    /// - The request fails or times out
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<CredentialSet, TokenManagerError> {
        let _guard = self.write_lock.lock().await;

        let config = self.config_source.oauth_client_config();
        let stored = self.load().await?.map(|current| current.refresh_token);
        let Some(refresh_token) = present(stored).or_else(|| present(config.refresh_token.clone()))
        else {
            warn!("refresh requested without a refresh token; operator must re-authorize");
            self.flow.lock().reauthorization_required = true;
            return Err(TokenManagerError::MissingCredential(
                "no refresh token available, please contact the administrator".to_string(),
            ));
        };

        let request = refresh_request(config, refresh_token)?;

        let credentials = match self
            .oauth_client
            .refresh_access_token(&request)
            .await
            .and_then(|response| response.into_credentials(self.clock.now()))
        {
            Ok(credentials) => credentials,
            Err(err) => {
                let err = refresh_error(err);
                if matches!(err, TokenManagerError::Refresh { status: Some(_), .. }) {
                    warn!("refresh token rejected; operator must re-authorize");
                    self.flow.lock().reauthorization_required = true;
                }
                return Err(err);
            }
        };

        self.store.replace(credentials.clone()).await?;
        *self.flow.lock() = FlowState::default();

        info!(expires_at = %credentials.expires_at, "access token refreshed");
        Ok(credentials)
    }

    /// Access token for API calls, only if the stored set is unexpired.
    ///
    /// # Errors
    /// Returns `MissingCredential` without a stored set and `Expired` once
    /// `expires_at` has passed.
    pub async fn access_token(&self) -> Result<String, TokenManagerError> {
        match self.load().await? {
            None => Err(TokenManagerError::MissingCredential(
                "not authorized with the marketing platform".to_string(),
            )),
            Some(current) if current.is_expired_at(self.clock.now()) => {
                Err(TokenManagerError::Expired)
            }
            Some(current) => Ok(current.access_token),
        }
    }

    /// Current lifecycle state, derived from the store, the clock and the
    /// authorization progress.
    ///
    /// An expired set whose refresh failed terminally reports `NoCredential`
    /// until a new authorization starts.
    ///
    /// # Errors
    /// Returns error if the store cannot be read
    pub async fn state(&self) -> Result<CredentialState, TokenManagerError> {
        let now = self.clock.now();
        let flow = *self.flow.lock();

        Ok(match (self.load().await?, flow.pending_since) {
            (Some(current), _) if !current.is_expired_at(now) => {
                CredentialState::Valid { expires_at: current.expires_at }
            }
            (_, Some(since)) => CredentialState::Pending { since },
            (Some(current), None) if !flow.reauthorization_required => {
                CredentialState::Expired { expired_at: current.expires_at }
            }
            _ => CredentialState::NoCredential,
        })
    }

    /// Current credential set without expiry checks.
    ///
    /// # Errors
    /// Returns error if the store cannot be read
    pub async fn credentials(&self) -> Result<Option<CredentialSet>, TokenManagerError> {
        self.load().await
    }

    /// Store `credentials` only if nothing is stored yet.
    ///
    /// Returns `true` when the seed was written.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written
    pub async fn seed_if_empty(
        &self,
        credentials: CredentialSet,
    ) -> Result<bool, TokenManagerError> {
        let _guard = self.write_lock.lock().await;
        if self.load().await?.is_some() {
            return Ok(false);
        }
        self.store.replace(credentials).await?;
        info!("credential store seeded from environment");
        Ok(true)
    }

    async fn load(&self) -> Result<Option<CredentialSet>, TokenManagerError> {
        Ok(self.store.load().await?)
    }
}

fn exchange_error(err: OAuthClientError) -> TokenManagerError {
    match err {
        OAuthClientError::Rejected { status, body } => {
            TokenManagerError::Exchange { status: Some(status), body }
        }
        OAuthClientError::Malformed { reason } => {
            TokenManagerError::Exchange { status: None, body: reason }
        }
        OAuthClientError::Transport(message) => TokenManagerError::Transport(message),
    }
}

fn refresh_error(err: OAuthClientError) -> TokenManagerError {
    match err {
        OAuthClientError::Rejected { status, body } => {
            TokenManagerError::Refresh { status: Some(status), body }
        }
        OAuthClientError::Malformed { reason } => {
            TokenManagerError::Refresh { status: None, body: reason }
        }
        OAuthClientError::Transport(message) => TokenManagerError::Transport(message),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, TokenManagerError> {
    present(value)
        .ok_or_else(|| TokenManagerError::Configuration(format!("missing required setting `{name}`")))
}

fn refresh_request(
    config: OAuthClientConfig,
    refresh_token: String,
) -> Result<RefreshRequest, TokenManagerError> {
    Ok(RefreshRequest {
        client_id: required(config.client_id, "client_id")?,
        client_secret: required(config.client_secret, "client_secret")?,
        refresh_token,
    })
}
