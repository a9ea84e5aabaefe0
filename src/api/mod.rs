//! REST API client module for the Tradium backend.
//!
//! This module provides the `ApiClient` for communicating with the trading
//! API: authentication, market data, portfolio and position reads, order
//! history, transfers, and trade execution.
//!
//! The API uses JWT bearer token authentication obtained through the
//! login endpoint; every other call attaches the token in a single
//! `Authorization` header.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginResponse};
pub use error::ApiError;
