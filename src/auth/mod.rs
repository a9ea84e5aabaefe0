//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `CredentialStore`: one contract over the platform credential stores,
//!   with a secure keychain implementation and a plaintext file fallback
//! - `Session`: the token/user-id pair lifecycle and session state machine
//!
//! Exactly two values are ever persisted: the session bearer token and the
//! user identifier, written together at login and deleted together at logout.

pub mod session;
pub mod store;

pub use session::{Session, SessionData, SessionState};
pub use store::{
    platform_store, CredentialStore, FileStore, KeyringStore, StoreError, TOKEN_KEY, USER_ID_KEY,
};
