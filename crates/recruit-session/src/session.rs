//! Currently known identity
//!
//! Set after login, registration or a "who am I" fetch; cleared on logout or
//! when the client gives up on refreshing credentials. Never persisted: a
//! fresh process starts anonymous until the identity is re-established.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

use crate::identity::{Identity, Role};

#[derive(Default)]
pub struct AuthSession {
    identity: RwLock<Option<Identity>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any prior identity.
    pub fn set_identity(&self, identity: Identity) {
        info!(user_id = %identity.id, role = %identity.role, "session identity set");
        let mut slot = self.identity.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(identity);
    }

    pub fn clear_identity(&self) {
        let mut slot = self.identity.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            debug!("session identity cleared");
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|identity| identity.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::sample;

    #[test]
    fn starts_anonymous() {
        let session = AuthSession::new();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(session.role().is_none());
    }

    #[test]
    fn set_replaces_prior_identity() {
        let session = AuthSession::new();
        session.set_identity(sample(Role::Candidate));
        session.set_identity(sample(Role::Admin));
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Admin));
    }

    #[test]
    fn clear_is_idempotent() {
        let session = AuthSession::new();
        session.set_identity(sample(Role::Recruiter));
        session.clear_identity();
        session.clear_identity();
        assert!(!session.is_authenticated());
    }
}
