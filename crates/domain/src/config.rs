//! Configuration structures
//!
//! `BridgeConfig` is loaded once at startup. `OAuthClientConfig` and
//! `CrmSettings` are snapshots of per-call settings and are re-read on every
//! operation, so their fields are optional: absence is detected by the
//! operation that needs them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BIND_ADDR, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OAUTH_BASE_URL};

/// Startup configuration for the bridge process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub bind_addr: String,
    pub http_timeout_secs: u64,
    pub oauth_base_url: String,
    /// Overrides `https://{COMPANY_DOMAIN}.pipedrive.com` when set.
    pub crm_base_url: Option<String>,
    /// JSON file backing the credential store; in-memory when absent.
    pub credential_store_path: Option<String>,
    pub failure_policy: FailurePolicy,
    /// Whether a successful authorization callback stores the exchanged
    /// credential set.
    pub persist_callback_tokens: bool,
}

impl BridgeConfig {
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            oauth_base_url: DEFAULT_OAUTH_BASE_URL.to_string(),
            crm_base_url: None,
            credential_store_path: None,
            failure_policy: FailurePolicy::default(),
            persist_callback_tokens: true,
        }
    }
}

/// What the lead replicator does after a CRM-side rejection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the batch at the first rejection; later leads are not attempted.
    #[default]
    StopAtFirstFailure,
    /// Attempt every lead, then fail with the first rejection.
    ContinueOnFailure,
}

/// OAuth client settings for the marketing platform.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OAuthClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    /// Operator-seeded refresh token, used when no credential set is stored.
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// CRM access settings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CrmSettings {
    pub api_token: Option<String>,
    pub company_domain: Option<String>,
}

impl std::fmt::Debug for CrmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmSettings")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("company_domain", &self.company_domain)
            .finish()
    }
}

/// CRM settings with every required value present.
#[derive(Clone, PartialEq, Eq)]
pub struct CrmCredentials {
    pub api_token: String,
    pub company_domain: String,
}

impl std::fmt::Debug for CrmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmCredentials")
            .field("api_token", &"<redacted>")
            .field("company_domain", &self.company_domain)
            .finish()
    }
}

impl CrmSettings {
    /// Resolve into credentials, failing fast on the first missing value.
    ///
    /// # Errors
    /// Returns `BridgeError::Configuration` naming the absent setting.
    pub fn require(self) -> crate::Result<CrmCredentials> {
        let api_token = self
            .api_token
            .ok_or_else(|| crate::BridgeError::configuration("CRM API token is not configured"))?;
        let company_domain = self.company_domain.ok_or_else(|| {
            crate::BridgeError::configuration("CRM company domain is not configured")
        })?;
        Ok(CrmCredentials { api_token, company_domain })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crm_settings_require_both_values() {
        let missing_domain =
            CrmSettings { api_token: Some("tok".into()), company_domain: None };
        assert_eq!(missing_domain.require().unwrap_err().kind(), "configuration");

        let complete =
            CrmSettings { api_token: Some("tok".into()), company_domain: Some("acme".into()) };
        assert_eq!(complete.require().unwrap().company_domain, "acme");
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = OAuthClientConfig {
            client_id: Some("id".into()),
            client_secret: Some("very-secret".into()),
            redirect_uri: None,
            refresh_token: Some("refresh-secret".into()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("refresh-secret"));
    }

    #[test]
    fn default_policy_stops_at_first_failure() {
        assert_eq!(BridgeConfig::default().failure_policy, FailurePolicy::StopAtFirstFailure);
    }
}
