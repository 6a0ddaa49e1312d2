//! Startup wiring: store selection and credential seeding

use chrono::{Duration, Utc};
use leadbridge_api::AppContext;
use leadbridge_domain::{BridgeConfig, CredentialSet};
use tempfile::TempDir;

fn seed(access: &str) -> CredentialSet {
    CredentialSet {
        access_token: access.into(),
        refresh_token: format!("{access}-refresh"),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

#[tokio::test]
async fn seed_populates_empty_file_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    let config = BridgeConfig {
        credential_store_path: Some(path.display().to_string()),
        ..BridgeConfig::default()
    };

    let context = AppContext::new(config).unwrap();
    context.seed_credentials(Some(seed("first"))).await.unwrap();

    assert!(path.exists());
    assert_eq!(context.token_manager.access_token().await.unwrap(), "first");
}

#[tokio::test]
async fn seed_never_overwrites_stored_credentials() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.json");
    let config = BridgeConfig {
        credential_store_path: Some(path.display().to_string()),
        ..BridgeConfig::default()
    };

    AppContext::new(config.clone()).unwrap().seed_credentials(Some(seed("first"))).await.unwrap();

    let restarted = AppContext::new(config).unwrap();
    restarted.seed_credentials(Some(seed("second"))).await.unwrap();

    assert_eq!(restarted.token_manager.access_token().await.unwrap(), "first");
}

#[tokio::test]
async fn missing_seed_leaves_store_empty() {
    let context = AppContext::new(BridgeConfig::default()).unwrap();

    context.seed_credentials(None).await.unwrap();

    assert!(context.token_manager.credentials().await.unwrap().is_none());
}
