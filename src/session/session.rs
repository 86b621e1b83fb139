use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::state::SessionState;
use crate::api::IdentityClient;
use crate::error::SessionError;
use crate::models::{Credential, Identity, Role};
use crate::store::TokenStore;

/// Single source of truth for the current user.
///
/// Owned explicitly and shared by `Arc` with the navigation guard and with
/// whatever builds authenticated requests. The lock is only held for short
/// reads and writes, never across an await.
pub struct Session {
    state: RwLock<SessionState>,
    store: Arc<dyn TokenStore>,
    client: Arc<dyn IdentityClient>,
}

fn read(state: &RwLock<SessionState>) -> RwLockReadGuard<'_, SessionState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(state: &RwLock<SessionState>) -> RwLockWriteGuard<'_, SessionState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Marks the session as loading until dropped, whichever way the call ends.
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    fn engage(state: &'a RwLock<SessionState>) -> Self {
        write(state).begin_loading();
        LoadingGuard { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        write(self.state).end_loading();
    }
}

impl Session {
    /// An empty, logged-out session.
    pub fn new(store: Arc<dyn TokenStore>, client: Arc<dyn IdentityClient>) -> Self {
        Session {
            state: RwLock::new(SessionState::anonymous()),
            store,
            client,
        }
    }

    /// Builds a session from whatever credential the store persisted.
    /// Any storage failure starts the session logged out.
    pub async fn restore(store: Arc<dyn TokenStore>, client: Arc<dyn IdentityClient>) -> Self {
        let session = Self::new(store, client);
        match session.store.load().await {
            Ok(Some(credential)) => {
                info!("Restored persisted session token.");
                write(&session.state).set_credential(credential);
            }
            Ok(None) => debug!("No persisted session token."),
            Err(e) if !session.store.is_enabled() => {
                debug!("Token store disabled, starting logged out: {}", e)
            }
            Err(e) => warn!("Could not read persisted session token, starting logged out: {}", e),
        }
        session
    }

    pub fn snapshot(&self) -> SessionState {
        read(&self.state).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        read(&self.state).is_authenticated()
    }

    pub fn role(&self) -> Option<Role> {
        read(&self.state).role()
    }

    pub fn is_admin(&self) -> bool {
        read(&self.state).is_admin()
    }

    pub fn is_loading(&self) -> bool {
        read(&self.state).is_loading()
    }

    pub fn identity(&self) -> Option<Identity> {
        read(&self.state).identity().cloned()
    }

    pub fn credential(&self) -> Option<Credential> {
        read(&self.state).credential().cloned()
    }

    /// `Authorization` header value for authenticated resource calls.
    pub fn bearer_header(&self) -> Result<String, SessionError> {
        read(&self.state)
            .credential()
            .map(Credential::bearer)
            .ok_or(SessionError::NotAuthenticated)
    }

    /// Exchanges username/password for a token, persists it and loads the
    /// identity behind it.
    ///
    /// A rejected login leaves the session without a credential. If the
    /// token is issued but the identity lookup fails, the token stays and the
    /// identity stays absent; the next guarded navigation retries the lookup.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, SessionError> {
        let _loading = LoadingGuard::engage(&self.state);
        info!("Logging in as '{}'", username);

        let credential = match self.client.login(username, password).await {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Login for '{}' failed: {}", username, e.message());
                return Err(e.into());
            }
        };

        write(&self.state).set_credential(credential.clone());
        if let Err(e) = self.store.save(&credential).await {
            if self.store.is_enabled() {
                warn!("Could not persist session token: {}", e);
            } else {
                debug!("Token store disabled, token kept in memory only.");
            }
        }

        match self.fetch_identity().await? {
            Some(identity) => Ok(identity),
            None => Err(SessionError::NotAuthenticated),
        }
    }

    /// Looks up the identity for the current credential and replaces it whole.
    ///
    /// Returns `Ok(None)` without a request when there is no credential. A
    /// failure is returned as is; the credential is left for the caller to
    /// deal with.
    pub async fn fetch_identity(&self) -> Result<Option<Identity>, SessionError> {
        let credential = match self.credential() {
            Some(credential) => credential,
            None => {
                debug!("No credential, skipping identity lookup.");
                return Ok(None);
            }
        };

        let _loading = LoadingGuard::engage(&self.state);
        let identity = match self.client.me(&credential).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Identity lookup failed: {}", e.message());
                return Err(e.into());
            }
        };

        if !write(&self.state).replace_identity_for(&credential, identity.clone()) {
            debug!("Credential changed during identity lookup; dropping the result.");
            return Err(SessionError::Superseded);
        }
        info!(
            "Session identity is '{}' (id {}, role {})",
            identity.username, identity.id, identity.role
        );
        Ok(Some(identity))
    }

    /// Forgets the credential and identity, in memory and in the store.
    /// Safe to call any number of times.
    pub async fn logout(&self) {
        let was_authenticated = {
            let mut state = write(&self.state);
            let was = state.is_authenticated();
            state.clear();
            was
        };
        if was_authenticated {
            info!("Logged out.");
        }
        self.clear_store().await;
    }

    /// Logs out only if the session still holds `credential`. A session that
    /// has since moved on to another token, or already logged out, is left
    /// alone.
    pub async fn logout_if_current(&self, credential: &Credential) -> bool {
        if !write(&self.state).clear_if(credential) {
            debug!("Session credential changed, not logging out.");
            return false;
        }
        info!("Logged out.");
        self.clear_store().await;
        true
    }

    async fn clear_store(&self) {
        if let Err(e) = self.store.clear().await {
            if self.store.is_enabled() {
                warn!("Could not clear persisted session token: {}", e);
            }
        }
    }
}
