//! Session lifecycle over the credential store.
//!
//! A session is exactly two stored values: the bearer token and the user
//! identifier. They are written together and deleted together; a half-written
//! pair is treated as no session and cleaned up on the next resolve.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::store::{CredentialStore, StoreError, TOKEN_KEY, USER_ID_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user_id: String,
}

/// Session-level state machine.
///
/// `Unknown` only exists between construction and the first `resolve()`;
/// it always settles to one of the other two states before any screen-level
/// operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Unauthenticated,
    Authenticated(SessionData),
}

pub struct Session {
    store: Box<dyn CredentialStore>,
    state: SessionState,
}

impl Session {
    pub fn new(store: Box<dyn CredentialStore>) -> Self {
        Self {
            store,
            state: SessionState::Unknown,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Resolve the stored credentials into a settled session state.
    ///
    /// Storage only, never a network call. A partial pair (one key present
    /// without the other) counts as no session and the leftover entry is
    /// deleted so the pair invariant holds again.
    pub fn resolve(&mut self) -> Result<&SessionState, StoreError> {
        let token = self.store.get(TOKEN_KEY)?;
        let user_id = self.store.get(USER_ID_KEY)?;

        self.state = match (token, user_id) {
            (Some(token), Some(user_id)) => {
                debug!("Stored session found");
                SessionState::Authenticated(SessionData { token, user_id })
            }
            (None, None) => SessionState::Unauthenticated,
            (partial_token, _) => {
                warn!("Partial credential pair found; clearing leftovers");
                let leftover = if partial_token.is_some() {
                    TOKEN_KEY
                } else {
                    USER_ID_KEY
                };
                if let Err(e) = self.store.delete(leftover) {
                    warn!(error = %e, "Failed to clear leftover credential");
                }
                SessionState::Unauthenticated
            }
        };
        Ok(&self.state)
    }

    /// Persist a freshly issued credential pair and mark the session active.
    ///
    /// The token is written first; if the user id write fails the token is
    /// rolled back so a half-written pair is never left behind.
    pub fn establish(&mut self, data: SessionData) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, &data.token)?;
        if let Err(e) = self.store.set(USER_ID_KEY, &data.user_id) {
            if let Err(rollback) = self.store.delete(TOKEN_KEY) {
                warn!(error = %rollback, "Failed to roll back token after partial write");
            }
            return Err(e);
        }
        info!("Session established");
        self.state = SessionState::Authenticated(data);
        Ok(())
    }

    /// Delete both credentials and settle on `Unauthenticated`.
    ///
    /// Best-effort on each key: a failure deleting one does not stop the
    /// other from being deleted, and the in-memory state transitions
    /// regardless so the caller never keeps using a cleared session.
    pub fn clear(&mut self) {
        for key in [TOKEN_KEY, USER_ID_KEY] {
            if let Err(e) = self.store.delete(key) {
                warn!(key, error = %e, "Failed to delete credential");
            }
        }
        info!("Session cleared");
        self.state = SessionState::Unauthenticated;
    }

    /// Borrow the current credential pair, if authenticated.
    pub fn credentials(&self) -> Option<&SessionData> {
        match &self.state {
            SessionState::Authenticated(data) => Some(data),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials().map(|d| d.token.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.credentials().map(|d| d.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }
}
