//! Application context - dependency injection container

use std::sync::Arc;

use leadbridge_common::auth::{
    CredentialStore, MemoryCredentialStore, OAuthClient, OAuthEndpoints, TokenManager,
};
use leadbridge_core::LeadReplicator;
use leadbridge_domain::{BridgeConfig, BridgeError, CredentialSet, Result};
use leadbridge_infra::{EnvSettings, FileCredentialStore, HttpClient, PipedriveClient};
use tracing::{info, warn};

/// Type alias for the credential store trait object
pub type DynCredentialStore = dyn CredentialStore + 'static;

/// Token manager wired to the real provider client
pub type BridgeTokenManager = TokenManager<OAuthClient, DynCredentialStore>;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: BridgeConfig,
    pub token_manager: Arc<BridgeTokenManager>,
    pub replicator: Arc<LeadReplicator>,
}

impl AppContext {
    /// Build the context from startup configuration and the process
    /// environment.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let store: Arc<DynCredentialStore> = match &config.credential_store_path {
            Some(path) => {
                info!(path = %path, "using file credential store");
                Arc::new(FileCredentialStore::new(path))
            }
            None => {
                warn!("using in-memory credential store; credentials are lost on restart");
                Arc::new(MemoryCredentialStore::new())
            }
        };

        Self::with_parts(config, EnvSettings::from_process(), store)
    }

    /// Build the context from explicit settings and store.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn with_parts(
        config: BridgeConfig,
        env: EnvSettings,
        store: Arc<DynCredentialStore>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("leadbridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let env = Arc::new(env);

        let oauth_client = OAuthClient::with_client(
            OAuthEndpoints::from_base_url(&config.oauth_base_url),
            http.inner().clone(),
        );
        let token_manager = TokenManager::new(oauth_client, store, env.clone())
            .persist_callback_tokens(config.persist_callback_tokens);

        let crm = PipedriveClient::new(http).with_base_url(config.crm_base_url.clone());
        let replicator =
            LeadReplicator::new(Arc::new(crm), env).with_failure_policy(config.failure_policy);

        Ok(Self {
            config,
            token_manager: Arc::new(token_manager),
            replicator: Arc::new(replicator),
        })
    }

    /// Populate an empty credential store with the environment seed.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written
    pub async fn seed_credentials(&self, seed: Option<CredentialSet>) -> Result<()> {
        let Some(seed) = seed else {
            return Ok(());
        };
        let seeded =
            self.token_manager.seed_if_empty(seed).await.map_err(BridgeError::from)?;
        if !seeded {
            info!("credential store already populated; environment seed ignored");
        }
        Ok(())
    }
}
