use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wrapper around the portfolio response; the payload nests the portfolio
/// under a `portfolio` key.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioResponse {
    pub portfolio: Portfolio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(rename = "availableFunds")]
    pub available_funds: f64,
    /// Positions keyed by symbol
    #[serde(default)]
    pub positions: HashMap<String, Position>,
}

/// A holding in one symbol: quantity, cost basis, and server-computed
/// market value. All PnL math is done server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "positionId")]
    pub position_id: Option<String>,
    pub symbol: String,
    pub quantity: f64,
    #[serde(rename = "type")]
    pub position_type: String,
    #[serde(rename = "averagePurchasePrice")]
    pub average_purchase_price: f64,
    #[serde(rename = "positionRatio")]
    pub position_ratio: Option<f64>,
    #[serde(rename = "currentPrice")]
    pub current_price: Option<f64>,
    #[serde(rename = "marketValue")]
    pub market_value: Option<f64>,
    #[serde(rename = "totalCost")]
    pub total_cost: Option<f64>,
}

/// Whole-portfolio rollup from the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    #[serde(rename = "totalMarketValue")]
    pub total_market_value: f64,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
    #[serde(rename = "totalNetValue")]
    pub total_net_value: f64,
    #[serde(rename = "openPnL")]
    pub open_pnl: f64,
    #[serde(rename = "percentagePnL")]
    pub percentage_pnl: f64,
    #[serde(rename = "dayPnL")]
    pub day_pnl: f64,
    #[serde(rename = "dayPercentagePnL")]
    pub day_percentage_pnl: f64,
}

/// Per-symbol rollup from the position-summary endpoint.
/// The server spells PnL in caps on this payload only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    pub symbol: String,
    pub quantity: f64,
    #[serde(rename = "averagePurchasePrice")]
    pub average_purchase_price: f64,
    #[serde(rename = "currentPrice")]
    pub current_price: f64,
    #[serde(rename = "marketValue")]
    pub market_value: f64,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
    #[serde(rename = "openPNL")]
    pub open_pnl: f64,
    #[serde(rename = "openPNLPercentage")]
    pub open_pnl_percentage: f64,
}
