//! In-memory credential store
//!
//! Process-lifetime storage: the credential set is lost on restart. Use a
//! persistent [`CredentialStore`] implementation when that matters.

use async_trait::async_trait;
use leadbridge_domain::CredentialSet;
use tokio::sync::RwLock;

use super::traits::{CredentialStore, CredentialStoreError};

/// Credential store holding a single set behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    current: RwLock<Option<CredentialSet>>,
}

impl MemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<CredentialSet>, CredentialStoreError> {
        Ok(self.current.read().await.clone())
    }

    async fn replace(&self, credentials: CredentialSet) -> Result<(), CredentialStoreError> {
        *self.current.write().await = Some(credentials);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn replace_overwrites_whole_record() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().await.unwrap().is_none());

        let first = CredentialSet::issued("a1".into(), "r1".into(), 60, Utc::now()).unwrap();
        let second = CredentialSet::issued("a2".into(), "r2".into(), 120, Utc::now()).unwrap();
        store.replace(first).await.unwrap();
        store.replace(second.clone()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(second));
    }
}
