//! Data models for Tradium entities.
//!
//! This module contains the view-model structures reconstructed from server
//! responses:
//!
//! - `Stock`, `Quote`: market overview and latest quote for a symbol
//! - `Portfolio`, `Position`, `PortfolioSummary`, `PositionSummary`: holdings
//! - `Order`, `OrderType`, `TradeRequest`: order history and trade execution
//! - `Transfer`, `TransferKind`: the cash-flow log
//! - `UserProfile`, `Watchlist`
//!
//! Nothing here is cached across screens; every structure is rebuilt from
//! the latest response and discarded when the screen goes away.

pub mod order;
pub mod portfolio;
pub mod stock;
pub mod transfer;
pub mod user;
pub mod watchlist;

use serde::Deserialize;

pub use order::{Order, OrderType, OrdersResponse, TradeRequest};
pub use portfolio::{Portfolio, PortfolioResponse, PortfolioSummary, Position, PositionSummary};
pub use stock::{Quote, Stock, StockResponse};
pub use transfer::{Transfer, TransferKind};
pub use user::{ResetPasswordRequest, UserProfile};
pub use watchlist::Watchlist;

/// Generic acknowledgement body for write endpoints (trade execution,
/// deposits, withdrawals).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
}
