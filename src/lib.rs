//! Tradium core - the headless client library for the Tradium trading app.
//!
//! This crate provides everything below the UI: the credential store for the
//! two session secrets, the session state machine, the authenticated API
//! client for the trading backend, the view-model types, local input
//! validation, and cancellable background fetch tasks.
//!
//! The typical flow mirrors the app shell:
//!
//! 1. Build an [`App`] and call [`App::resolve_session`] at launch; the
//!    stored credential pair gates the authenticated area.
//! 2. [`App::login`] persists the issued token/user-id pair; every screen
//!    operation afterwards resolves it freshly and attaches the bearer token.
//! 3. Any auth-rejected response clears the stored pair and settles the
//!    session on unauthenticated, uniformly for every operation.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod tasks;
pub mod utils;

pub use api::{ApiClient, ApiError, LoginResponse};
pub use app::App;
pub use auth::{
    platform_store, CredentialStore, FileStore, KeyringStore, Session, SessionData, SessionState,
    StoreError, TOKEN_KEY, USER_ID_KEY,
};
pub use config::Config;
pub use tasks::FetchTask;
