use crate::models::{Credential, Identity, Role};

/// Snapshot of the authentication aggregate.
///
/// `is_authenticated`, `role` and `is_admin` are computed from the
/// credential/identity pair on every call. An identity is never reported
/// without a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    credential: Option<Credential>,
    identity: Option<Identity>,
    pending: u32,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Holding a token whose identity has not been looked up yet.
    pub fn with_credential(credential: Credential) -> Self {
        SessionState {
            credential: Some(credential),
            ..Self::default()
        }
    }

    /// Fully resolved session.
    pub fn with_identity(credential: Credential, identity: Identity) -> Self {
        SessionState {
            credential: Some(credential),
            identity: Some(identity),
            pending: 0,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.credential.as_ref().and(self.identity.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|identity| identity.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// True while a login or identity lookup is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// Authenticated, but the identity still has to be fetched.
    pub fn needs_identity(&self) -> bool {
        self.is_authenticated() && self.identity().is_none()
    }

    /// A new token invalidates whatever identity belonged to the old one.
    pub(crate) fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
        self.identity = None;
    }

    /// Replaces the identity if `credential` is still the current one.
    pub(crate) fn replace_identity_for(&mut self, credential: &Credential, identity: Identity) -> bool {
        if self.credential.as_ref() != Some(credential) {
            return false;
        }
        self.identity = Some(identity);
        true
    }

    pub(crate) fn clear(&mut self) {
        self.credential = None;
        self.identity = None;
    }

    /// Clears the session only if it still holds `credential`.
    pub(crate) fn clear_if(&mut self, credential: &Credential) -> bool {
        if self.credential.as_ref() != Some(credential) {
            return false;
        }
        self.clear();
        true
    }

    pub(crate) fn begin_loading(&mut self) {
        self.pending += 1;
    }

    pub(crate) fn end_loading(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }
}
