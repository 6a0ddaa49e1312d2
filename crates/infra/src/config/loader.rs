//! Configuration loader
//!
//! Loads startup configuration from environment variables.
//!
//! ## Environment Variables
//! - `LEADBRIDGE_BIND_ADDR`: Listen address (default `0.0.0.0:8000`)
//! - `LEADBRIDGE_HTTP_TIMEOUT_SECS`: Outbound request timeout, 1 to 120
//! - `LEADBRIDGE_OAUTH_BASE_URL`: Marketing platform API base URL
//! - `LEADBRIDGE_CRM_BASE_URL`: Overrides `https://{COMPANY_DOMAIN}.pipedrive.com`
//! - `LEADBRIDGE_CREDENTIAL_STORE`: JSON file for credentials (in-memory when unset)
//! - `LEADBRIDGE_FAILURE_POLICY`: `stop` or `continue`
//! - `LEADBRIDGE_PERSIST_CALLBACK_TOKENS`: Store exchanged tokens (true/false)
//!
//! ## Seed Credentials
//! `RDSTATION_ACCESS_TOKEN`, `RDSTATION_REFRESH_TOKEN` and
//! `RDSTATION_EXPIRES_IN` (absolute unix seconds) describe an existing
//! credential set used to populate an empty store at startup.

use chrono::DateTime;
use leadbridge_domain::constants::{
    ENV_SEED_ACCESS_TOKEN, ENV_SEED_EXPIRES_AT, ENV_SEED_REFRESH_TOKEN, MAX_HTTP_TIMEOUT_SECS,
};
use leadbridge_domain::{BridgeConfig, BridgeError, CredentialSet, FailurePolicy, Result};
use tracing::warn;

use super::env_settings::EnvSettings;

pub const ENV_BIND_ADDR: &str = "LEADBRIDGE_BIND_ADDR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "LEADBRIDGE_HTTP_TIMEOUT_SECS";
pub const ENV_OAUTH_BASE_URL: &str = "LEADBRIDGE_OAUTH_BASE_URL";
pub const ENV_CRM_BASE_URL: &str = "LEADBRIDGE_CRM_BASE_URL";
pub const ENV_CREDENTIAL_STORE: &str = "LEADBRIDGE_CREDENTIAL_STORE";
pub const ENV_FAILURE_POLICY: &str = "LEADBRIDGE_FAILURE_POLICY";
pub const ENV_PERSIST_CALLBACK_TOKENS: &str = "LEADBRIDGE_PERSIST_CALLBACK_TOKENS";

/// Load configuration from environment variables
///
/// Every variable is optional; unset ones take their defaults.
///
/// # Errors
/// Returns `BridgeError::Configuration` if a variable has an invalid value.
pub fn load_from_env() -> Result<BridgeConfig> {
    load_with(&EnvSettings::from_process())
}

/// Load configuration through an arbitrary settings lookup.
///
/// # Errors
/// Returns `BridgeError::Configuration` if a value is invalid.
pub fn load_with(env: &EnvSettings) -> Result<BridgeConfig> {
    let defaults = BridgeConfig::default();

    let http_timeout_secs = match env.get(ENV_HTTP_TIMEOUT_SECS) {
        Some(raw) => parse_timeout(&raw)?,
        None => defaults.http_timeout_secs,
    };

    let oauth_base_url = match env.get(ENV_OAUTH_BASE_URL) {
        Some(raw) => parse_url(ENV_OAUTH_BASE_URL, &raw)?,
        None => defaults.oauth_base_url,
    };

    let crm_base_url =
        env.get(ENV_CRM_BASE_URL).map(|raw| parse_url(ENV_CRM_BASE_URL, &raw)).transpose()?;

    let failure_policy = match env.get(ENV_FAILURE_POLICY) {
        Some(raw) => parse_failure_policy(&raw)?,
        None => defaults.failure_policy,
    };

    let persist_callback_tokens = match env.get(ENV_PERSIST_CALLBACK_TOKENS) {
        Some(raw) => parse_bool(ENV_PERSIST_CALLBACK_TOKENS, &raw)?,
        None => defaults.persist_callback_tokens,
    };

    Ok(BridgeConfig {
        bind_addr: env.get(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
        http_timeout_secs,
        oauth_base_url,
        crm_base_url,
        credential_store_path: env.get(ENV_CREDENTIAL_STORE),
        failure_policy,
        persist_callback_tokens,
    })
}

/// Seed credential set from the process environment.
///
/// # Errors
/// Returns `BridgeError::Configuration` if `RDSTATION_EXPIRES_IN` is not a
/// unix timestamp.
pub fn seed_credentials_from_env() -> Result<Option<CredentialSet>> {
    seed_credentials_with(&EnvSettings::from_process())
}

/// Seed credential set, present only when all three values are set.
///
/// # Errors
/// Returns `BridgeError::Configuration` if the expiry is not a unix timestamp.
pub fn seed_credentials_with(env: &EnvSettings) -> Result<Option<CredentialSet>> {
    let access = env.get(ENV_SEED_ACCESS_TOKEN);
    let refresh = env.get(ENV_SEED_REFRESH_TOKEN);
    let expires = env.get(ENV_SEED_EXPIRES_AT);

    match (access, refresh, expires) {
        (Some(access_token), Some(refresh_token), Some(raw_expiry)) => {
            let expires_at = raw_expiry
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .ok_or_else(|| {
                    BridgeError::configuration(format!(
                        "Invalid {ENV_SEED_EXPIRES_AT}: expected unix seconds, got {raw_expiry}"
                    ))
                })?;
            Ok(Some(CredentialSet { access_token, refresh_token, expires_at }))
        }
        (None, None, None) => Ok(None),
        _ => {
            warn!("incomplete seed credentials in environment; ignoring them");
            Ok(None)
        }
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs = raw
        .parse::<u64>()
        .map_err(|e| BridgeError::configuration(format!("Invalid HTTP timeout: {e}")))?;
    if secs == 0 || secs > MAX_HTTP_TIMEOUT_SECS {
        return Err(BridgeError::configuration(format!(
            "Invalid HTTP timeout: {secs}s (allowed 1..={MAX_HTTP_TIMEOUT_SECS})"
        )));
    }
    Ok(secs)
}

fn parse_url(key: &str, raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| BridgeError::configuration(format!("Invalid {key}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BridgeError::configuration(format!("Invalid {key}: unsupported scheme")));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_failure_policy(raw: &str) -> Result<FailurePolicy> {
    match raw.to_ascii_lowercase().as_str() {
        "stop" | "stop_at_first_failure" => Ok(FailurePolicy::StopAtFirstFailure),
        "continue" | "continue_on_failure" => Ok(FailurePolicy::ContinueOnFailure),
        other => Err(BridgeError::configuration(format!(
            "Invalid {ENV_FAILURE_POLICY}: {other} (expected stop or continue)"
        ))),
    }
}

/// Parse boolean from an environment value
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(BridgeError::configuration(format!("Invalid {key}: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load_with(&EnvSettings::from_pairs::<&str, &str>([])).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn every_variable_is_honoured() {
        let env = EnvSettings::from_pairs([
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_HTTP_TIMEOUT_SECS, "30"),
            (ENV_OAUTH_BASE_URL, "http://localhost:7000/"),
            (ENV_CRM_BASE_URL, "http://localhost:7001"),
            (ENV_CREDENTIAL_STORE, "/var/lib/leadbridge/credentials.json"),
            (ENV_FAILURE_POLICY, "continue"),
            (ENV_PERSIST_CALLBACK_TOKENS, "off"),
        ]);

        let config = load_with(&env).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.oauth_base_url, "http://localhost:7000");
        assert_eq!(config.crm_base_url.as_deref(), Some("http://localhost:7001"));
        assert_eq!(
            config.credential_store_path.as_deref(),
            Some("/var/lib/leadbridge/credentials.json")
        );
        assert_eq!(config.failure_policy, FailurePolicy::ContinueOnFailure);
        assert!(!config.persist_callback_tokens);
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        for (key, value) in [
            (ENV_HTTP_TIMEOUT_SECS, "soon"),
            (ENV_HTTP_TIMEOUT_SECS, "0"),
            (ENV_HTTP_TIMEOUT_SECS, "600"),
            (ENV_OAUTH_BASE_URL, "not a url"),
            (ENV_CRM_BASE_URL, "ftp://example.com"),
            (ENV_FAILURE_POLICY, "retry"),
            (ENV_PERSIST_CALLBACK_TOKENS, "maybe"),
        ] {
            let err = load_with(&EnvSettings::from_pairs([(key, value)])).unwrap_err();
            assert_eq!(err.kind(), "configuration", "{key}={value}");
        }
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        for raw in ["1", "true", "YES", "on"] {
            assert!(parse_bool("K", raw).unwrap());
        }
        for raw in ["0", "false", "No", "OFF"] {
            assert!(!parse_bool("K", raw).unwrap());
        }
    }

    #[test]
    fn seed_requires_all_three_values() {
        let env = EnvSettings::from_pairs([
            (ENV_SEED_ACCESS_TOKEN, "at"),
            (ENV_SEED_REFRESH_TOKEN, "rt"),
            (ENV_SEED_EXPIRES_AT, "1717236000"),
        ]);

        let seed = seed_credentials_with(&env).unwrap().unwrap();

        assert_eq!(seed.access_token, "at");
        assert_eq!(seed.expires_at, chrono::Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap());

        let partial = EnvSettings::from_pairs([(ENV_SEED_ACCESS_TOKEN, "at")]);
        assert!(seed_credentials_with(&partial).unwrap().is_none());
    }

    #[test]
    fn seed_with_bad_expiry_fails() {
        let env = EnvSettings::from_pairs([
            (ENV_SEED_ACCESS_TOKEN, "at"),
            (ENV_SEED_REFRESH_TOKEN, "rt"),
            (ENV_SEED_EXPIRES_AT, "tomorrow"),
        ]);

        assert_eq!(seed_credentials_with(&env).unwrap_err().kind(), "configuration");
    }
}
