//! JSON file credential store
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! so readers see either the previous record or the new one. The file is
//! created owner-readable only on unix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use leadbridge_common::auth::{CredentialStore, CredentialStoreError};
use leadbridge_domain::CredentialSet;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Credential store persisted as a single JSON document.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<CredentialSet>, CredentialStoreError> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "credential file does not exist");
                return Ok(None);
            }
            Err(err) => return Err(self.read_error(err)),
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|err| CredentialStoreError::Corrupt(format!("{}: {err}", self.path.display())))
    }

    async fn write(&self, credentials: &CredentialSet) -> Result<(), CredentialStoreError> {
        let data = serde_json::to_vec_pretty(credentials)
            .map_err(|err| CredentialStoreError::Write(err.to_string()))?;
        let temp_path = self.path.with_extension("tmp");

        if let Some(parent) = temp_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| self.write_error(err))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp_path).await.map_err(|err| self.write_error(err))?;
        file.write_all(&data).await.map_err(|err| self.write_error(err))?;
        file.sync_all().await.map_err(|err| self.write_error(err))?;
        drop(file);

        fs::rename(&temp_path, &self.path).await.map_err(|err| self.write_error(err))
    }

    fn read_error(&self, err: std::io::Error) -> CredentialStoreError {
        CredentialStoreError::Read(format!("{}: {err}", self.path.display()))
    }

    fn write_error(&self, err: std::io::Error) -> CredentialStoreError {
        CredentialStoreError::Write(format!("{}: {err}", self.path.display()))
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<CredentialSet>, CredentialStoreError> {
        self.read().await
    }

    #[instrument(skip(self, credentials), fields(path = %self.path.display()))]
    async fn replace(&self, credentials: CredentialSet) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(&credentials).await?;
        debug!(expires_at = %credentials.expires_at, "credential file replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;

    fn credentials(tag: &str) -> CredentialSet {
        CredentialSet::issued(
            format!("access-{tag}"),
            format!("refresh-{tag}"),
            3600,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unwritable_target_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let store = FileCredentialStore::new(blocker.join("credentials.json"));

        let err = store.replace(credentials("a")).await.unwrap_err();

        assert!(matches!(err, CredentialStoreError::Write(_)));
    }

    #[tokio::test]
    async fn replace_survives_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/credentials.json");

        FileCredentialStore::new(&path).replace(credentials("a")).await.unwrap();
        FileCredentialStore::new(&path).replace(credentials("b")).await.unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), Some(credentials("b")));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"{not json").unwrap();

        let err = FileCredentialStore::new(&path).load().await.unwrap_err();

        assert!(matches!(err, CredentialStoreError::Corrupt(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        FileCredentialStore::new(&path).replace(credentials("a")).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
