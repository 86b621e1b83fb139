use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use super::TokenStore;
use crate::config::FileStoreConfig;
use crate::models::Credential;

/// Persists the credential under one key of a small JSON document, so other
/// client settings can share the file.
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(config: &FileStoreConfig) -> Self {
        FileTokenStore {
            path: PathBuf::from(&config.path),
            key: config.key.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document; a missing file is an empty document.
    async fn read_document(&self) -> Result<Map<String, Value>, String> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(format!(
                    "Failed to read token file {}: {}",
                    self.path.display(),
                    e
                ))
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(format!(
                "Token file {} does not hold a JSON object",
                self.path.display()
            )),
            Err(e) => Err(format!(
                "Failed to parse token file {}: {}",
                self.path.display(),
                e
            )),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }
        let body = serde_json::to_string_pretty(document)
            .map_err(|e| format!("Failed to encode token file: {}", e))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| format!("Failed to write token file {}: {}", self.path.display(), e))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Credential>, String> {
        let document = self.read_document().await?;
        let credential = document
            .get(&self.key)
            .and_then(Value::as_str)
            .and_then(Credential::parse);
        debug!(
            "Loaded token file {} (credential present: {})",
            self.path.display(),
            credential.is_some()
        );
        Ok(credential)
    }

    async fn save(&self, credential: &Credential) -> Result<(), String> {
        // An unreadable document is replaced rather than blocking the login.
        let mut document = self.read_document().await.unwrap_or_default();
        document.insert(self.key.clone(), Value::from(credential.as_str()));
        self.write_document(&document).await
    }

    async fn clear(&self) -> Result<(), String> {
        let mut document = match self.read_document().await {
            Ok(document) => document,
            // Nothing usable on disk; drop it so no stale token can be read back.
            Err(_) => Map::new(),
        };
        document.remove(&self.key);
        if document.is_empty() {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(format!(
                    "Failed to remove token file {}: {}",
                    self.path.display(),
                    e
                )),
            }
        } else {
            self.write_document(&document).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> FileTokenStore {
        FileTokenStore::new(&FileStoreConfig {
            path: dir.join("nested").join("session.json").display().to_string(),
            key: "clientops_auth_token".to_string(),
        })
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.load().await, Ok(None));
        assert_eq!(store.clear().await, Ok(()));
    }

    #[tokio::test]
    async fn test_save_then_load_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        store_in(dir.path())
            .save(&Credential::parse("tok-1").unwrap())
            .await
            .unwrap();
        store_in(dir.path())
            .save(&Credential::parse("tok-2").unwrap())
            .await
            .unwrap();

        let reopened = store_in(dir.path());
        assert_eq!(reopened.load().await, Ok(Credential::parse("tok-2")));

        reopened.clear().await.unwrap();
        assert!(!reopened.path().exists());
        assert_eq!(reopened.load().await, Ok(None));
    }

    #[tokio::test]
    async fn test_clear_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"theme": "dark", "clientops_auth_token": "tok"}"#,
        )
        .unwrap();

        store.clear().await.unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains("clientops_auth_token"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.load().await.is_err());
        // Saving over a corrupt file recovers it.
        store.save(&Credential::parse("fresh").unwrap()).await.unwrap();
        assert_eq!(store.load().await, Ok(Credential::parse("fresh")));
    }
}
