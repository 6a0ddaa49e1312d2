//! Per-call settings read from the process environment
//!
//! Nothing is cached: every lookup consults the environment again, so an
//! operator can rotate `API_TOKEN` or OAuth client settings without a
//! restart. Empty values count as absent.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use leadbridge_common::auth::ClientConfigSource;
use leadbridge_core::CrmSettingsSource;
use leadbridge_domain::constants::{
    ENV_CRM_API_TOKEN, ENV_CRM_COMPANY_DOMAIN, ENV_OAUTH_CLIENT_ID, ENV_OAUTH_CLIENT_SECRET,
    ENV_OAUTH_REDIRECT_URI, ENV_OAUTH_REFRESH_TOKEN,
};
use leadbridge_domain::{CrmSettings, OAuthClientConfig};

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Settings source backed by environment variables (or a stand-in lookup).
#[derive(Clone)]
pub struct EnvSettings {
    lookup: Lookup,
}

impl EnvSettings {
    /// Read from the live process environment.
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self { lookup: Arc::new(lookup) }
    }

    /// Fixed key/value pairs, for tests and embedding.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::from_lookup(move |key| map.get(key).cloned())
    }

    /// Trimmed value of `key`, `None` when unset or blank.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self::from_process()
    }
}

impl fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSettings").finish_non_exhaustive()
    }
}

impl ClientConfigSource for EnvSettings {
    fn oauth_client_config(&self) -> OAuthClientConfig {
        OAuthClientConfig {
            client_id: self.get(ENV_OAUTH_CLIENT_ID),
            client_secret: self.get(ENV_OAUTH_CLIENT_SECRET),
            redirect_uri: self.get(ENV_OAUTH_REDIRECT_URI),
            refresh_token: self.get(ENV_OAUTH_REFRESH_TOKEN),
        }
    }
}

impl CrmSettingsSource for EnvSettings {
    fn crm_settings(&self) -> CrmSettings {
        CrmSettings {
            api_token: self.get(ENV_CRM_API_TOKEN),
            company_domain: self.get(ENV_CRM_COMPANY_DOMAIN),
        }
    }
}
