use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::TokenStore;
use crate::models::Credential;

/// Keeps the credential for the lifetime of the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `credential`, as if saved by an earlier run.
    pub fn with_credential(credential: Credential) -> Self {
        MemoryTokenStore {
            slot: Mutex::new(Some(credential)),
        }
    }

    /// The stored credential, read synchronously.
    pub fn current(&self) -> Option<Credential> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<Credential>, String> {
        Ok(self.current())
    }

    async fn save(&self, credential: &Credential) -> Result<(), String> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
