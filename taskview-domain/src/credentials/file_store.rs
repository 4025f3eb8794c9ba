use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use taskview_core::config::CredentialsConfig;
use taskview_core::utils::fs;
use tracing::{debug, info};

use super::{Credential, CredentialError, CredentialSource};

/// Credential kept under `key` in a JSON object file, next to whatever other keys
/// the file already holds.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    key: String,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self { path: path.into(), key: key.into() }
    }

    /// `None` when the configuration disables file storage.
    pub fn from_config(config: &CredentialsConfig) -> Option<Self> {
        config.file_path.as_ref().map(|path| Self::new(path.clone(), config.key.clone()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>, CredentialError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_file_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(CredentialError::Corrupt {
                path: self.path.clone(),
                message: "top-level value is not an object".to_string(),
            }),
            Err(e) => Err(CredentialError::Corrupt { path: self.path.clone(), message: e.to_string() }),
        }
    }

    fn write_entries(&self, entries: Map<String, Value>) -> Result<(), CredentialError> {
        let content = serde_json::to_string_pretty(&Value::Object(entries))
            .map_err(|e| CredentialError::Corrupt { path: self.path.clone(), message: e.to_string() })?;
        fs::write_string_to_file(&self.path, &content)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Saves `credential` under the configured key, keeping other keys.
    pub fn store_credential(&self, credential: &Credential) -> Result<(), CredentialError> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), Value::String(credential.as_str().to_string()));
        self.write_entries(entries)?;
        info!(path = ?self.path, key = %self.key, "Credential stored");
        Ok(())
    }

    /// Removes the configured key. Returns whether anything was removed.
    pub fn clear_credential(&self) -> Result<bool, CredentialError> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_none() {
            return Ok(false);
        }
        self.write_entries(entries)?;
        info!(path = ?self.path, key = %self.key, "Credential cleared");
        Ok(true)
    }
}

#[async_trait]
impl CredentialSource for FileCredentialStore {
    async fn load_credential(&self) -> Result<Option<Credential>, CredentialError> {
        let entries = self.read_entries()?;
        let credential = match entries.get(&self.key) {
            Some(Value::String(token)) => Some(Credential::new(token.clone())),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(CredentialError::Corrupt {
                    path: self.path.clone(),
                    message: format!("value of '{}' is not a string: {}", self.key, other),
                })
            }
        };
        let credential = credential.filter(|c| !c.is_blank());
        debug!(path = ?self.path, present = credential.is_some(), "Loaded credential");
        Ok(credential)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        CredentialError::Storage(taskview_core::error::CoreError::Filesystem {
            message: "Failed to restrict credential file permissions".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), CredentialError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("nested/credentials.json"), "accessToken")
    }

    #[tokio::test]
    async fn test_missing_file_means_no_credential() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_then_load_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"theme": "dark"}"#).unwrap();

        store.store_credential(&Credential::new("h.p.s")).unwrap();

        assert_eq!(store.load_credential().await.unwrap(), Some(Credential::new("h.p.s")));
        let raw: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
    }

    #[tokio::test]
    async fn test_blank_value_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.store_credential(&Credential::new("   ")).unwrap();
        assert_eq!(store.load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_credential() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.store_credential(&Credential::new("h.p.s")).unwrap();

        assert!(store.clear_credential().unwrap());
        assert!(!store.clear_credential().unwrap());
        assert_eq!(store.load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "[1, 2]").unwrap();

        match store.load_credential().await {
            Err(CredentialError::Corrupt { .. }) => {}
            other => panic!("expected Corrupt, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stored_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.store_credential(&Credential::new("h.p.s")).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
