use super::TokenStore;
use crate::models::Credential;
use async_trait::async_trait;

/// A no-op store that always returns an error if called,
/// indicating persistence is disabled.
pub struct NoStore;

impl NoStore {
    pub fn new() -> Self {
        NoStore
    }
}

impl Default for NoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for NoStore {
    async fn load(&self) -> Result<Option<Credential>, String> {
        Err("Token store is disabled".into())
    }

    async fn save(&self, _credential: &Credential) -> Result<(), String> {
        Err("Token store is disabled".into())
    }

    async fn clear(&self) -> Result<(), String> {
        Err("Token store is disabled".into())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
