use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order type accepted by the execute-trade endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Buy,
    Sell,
    Short,
    CloseShort,
}

impl OrderType {
    pub const ALL: [OrderType; 4] = [
        OrderType::Buy,
        OrderType::Sell,
        OrderType::Short,
        OrderType::CloseShort,
    ];

    /// Whether this order opens or adds to a long position.
    pub fn is_buy(&self) -> bool {
        matches!(self, OrderType::Buy)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Buy => write!(f, "Buy"),
            OrderType::Sell => write!(f, "Sell"),
            OrderType::Short => write!(f, "Short"),
            OrderType::CloseShort => write!(f, "CloseShort"),
        }
    }
}

/// Wrapper around the order-history response; the payload nests the list
/// under an `orders` key.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// One executed order from the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub timestamp: DateTime<Utc>,
}

/// Request body for the execute-trade endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub order_type: OrderType,
}
