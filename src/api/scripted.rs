//! In-process `IdentityClient` for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::IdentityClient;
use crate::error::ApiError;
use crate::models::{Credential, Identity};

#[derive(Default)]
pub(crate) struct ScriptedIdentityClient {
    accounts: HashMap<String, (String, String)>,
    identities: HashMap<String, Identity>,
    unavailable_me: AtomicUsize,
    me_gate: Mutex<Option<oneshot::Receiver<()>>>,
    login_calls: AtomicUsize,
    me_calls: AtomicUsize,
}

impl ScriptedIdentityClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a user who can log in with `password` and receives `token`.
    pub(crate) fn account(mut self, identity: Identity, password: &str, token: &str) -> Self {
        self.accounts.insert(
            identity.username.clone(),
            (password.to_string(), token.to_string()),
        );
        self.identities.insert(token.to_string(), identity);
        self
    }

    /// Makes the next `count` identity lookups fail with a 503.
    pub(crate) fn unavailable_me(self, count: usize) -> Self {
        self.unavailable_me.store(count, Ordering::SeqCst);
        self
    }

    /// Holds the next identity lookup until the returned sender fires.
    pub(crate) fn gate_me(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.me_gate.lock().unwrap_or_else(PoisonError::into_inner) = Some(rx);
        tx
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn me_calls(&self) -> usize {
        self.me_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityClient for ScriptedIdentityClient {
    async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        match self.accounts.get(username) {
            Some((expected, token)) if expected == password => {
                Ok(Credential::parse(token.as_str()).expect("scripted tokens are not blank"))
            }
            _ => Err(ApiError::Unauthorized {
                detail: Some("Invalid username or password.".to_string()),
            }),
        }
    }

    async fn me(&self, credential: &Credential) -> Result<Identity, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self
            .me_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let remaining = self.unavailable_me.load(Ordering::SeqCst);
        if remaining > 0 {
            self.unavailable_me.store(remaining - 1, Ordering::SeqCst);
            return Err(ApiError::Status {
                status: 503,
                detail: None,
            });
        }
        self.identities
            .get(credential.as_str())
            .cloned()
            .ok_or(ApiError::Unauthorized {
                detail: Some("Invalid authentication credentials.".to_string()),
            })
    }
}
