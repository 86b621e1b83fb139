use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{file_store::FileTokenStore, memory_store::MemoryTokenStore, no_store::NoStore};
use crate::config::TokenStoreConfig;
use crate::models::Credential;

/// The TokenStore trait abstracts persistence of the single bearer credential.
///
/// Errors are plain strings; callers treat any failure as "no credential".
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Credential>, String>;
    async fn save(&self, credential: &Credential) -> Result<(), String>;
    async fn clear(&self) -> Result<(), String>;
    fn is_enabled(&self) -> bool {
        // Real stores are always enabled; NoStore returns false so we can
        // write better debug messages
        true
    }
}

/// Creates a concrete store implementation based on the TokenStoreConfig.
pub fn create_token_store(config: &TokenStoreConfig) -> Arc<dyn TokenStore> {
    match config {
        TokenStoreConfig::File(file_config) => {
            info!("Persisting the session token in {}", file_config.path);
            Arc::new(FileTokenStore::new(file_config))
        }
        TokenStoreConfig::Memory => {
            info!("Keeping the session token in memory only.");
            Arc::new(MemoryTokenStore::new())
        }
        TokenStoreConfig::Disabled => {
            info!("Token store is disabled. Using NoStore.");
            Arc::new(NoStore::new())
        }
    }
}
