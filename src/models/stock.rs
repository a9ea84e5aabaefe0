use serde::{Deserialize, Serialize};

/// Wrapper around the stock lookup response; the payload nests the
/// overview under a `stock` key.
#[derive(Debug, Clone, Deserialize)]
pub struct StockResponse {
    pub stock: Stock,
}

/// Stock overview as returned by the market-data endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    #[serde(rename = "currentPrice")]
    pub current_price: Option<f64>,
    pub country: Option<String>,
    #[serde(rename = "marketValue")]
    pub market_value: Option<f64>,
    #[serde(rename = "high52Week")]
    pub high_52_week: Option<f64>,
    #[serde(rename = "low52Week")]
    pub low_52_week: Option<f64>,
    pub eps: Option<f64>,
    #[serde(rename = "stockStatus")]
    pub stock_status: Option<String>,
    #[serde(rename = "stockSector")]
    pub stock_sector: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "movingAverage50Day")]
    pub moving_average_50_day: Option<f64>,
    #[serde(rename = "movingAverage200Day")]
    pub moving_average_200_day: Option<f64>,
    #[serde(rename = "dividendDate")]
    pub dividend_date: Option<String>,
    #[serde(rename = "exDividendDate")]
    pub ex_dividend_date: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "logoURL")]
    pub logo_url: Option<String>,
    #[serde(rename = "analystTargetPrice")]
    pub analyst_target_price: Option<f64>,
    #[serde(rename = "officialSite")]
    pub official_site: Option<String>,
    pub quote: Option<Quote>,
}

/// Latest quote for a symbol. Numeric fields are passed through exactly as
/// the server sent them; no rounding or truncation happens at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    #[serde(rename = "lastPrice")]
    pub last_price: f64,
    pub volume: f64,
    #[serde(rename = "latestTradingDay")]
    pub latest_trading_day: Option<String>,
    #[serde(rename = "previousClose")]
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    #[serde(rename = "changePercent")]
    pub change_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock_response_quote_fields_unmodified() {
        let json = r#"{
            "stock": {
                "symbol": "AAPL",
                "companyName": "Apple Inc",
                "currentPrice": 211.27,
                "country": "USA",
                "marketValue": 3170000000000.0,
                "high52Week": 260.1,
                "low52Week": 164.08,
                "eps": 6.42,
                "stockStatus": "Active",
                "stockSector": "Technology",
                "exchange": "NASDAQ",
                "movingAverage50Day": 205.33,
                "movingAverage200Day": 221.97,
                "dividendDate": "2025-05-15",
                "exDividendDate": "2025-05-12",
                "description": "Consumer electronics",
                "logoURL": "https://example.com/aapl.png",
                "analystTargetPrice": 235.5,
                "officialSite": "https://www.apple.com",
                "quote": {
                    "symbol": "AAPL",
                    "open": 210.885,
                    "high": 213.94,
                    "low": 210.58,
                    "lastPrice": 211.27,
                    "volume": 38861345,
                    "latestTradingDay": "2025-05-09",
                    "previousClose": 213.32,
                    "change": -2.05,
                    "changePercent": -0.961
                }
            }
        }"#;

        let parsed: StockResponse = serde_json::from_str(json).expect("parse stock");
        let quote = parsed.stock.quote.expect("quote present");
        assert_eq!(quote.open, 210.885);
        assert_eq!(quote.high, 213.94);
        assert_eq!(quote.low, 210.58);
        assert_eq!(quote.last_price, 211.27);
        assert_eq!(quote.volume, 38861345.0);
        assert_eq!(quote.previous_close, Some(213.32));
    }

    #[test]
    fn test_parse_stock_with_missing_optional_fields() {
        let json = r#"{"stock": {"symbol": "XYZ"}}"#;
        let parsed: StockResponse = serde_json::from_str(json).expect("parse sparse stock");
        assert_eq!(parsed.stock.symbol, "XYZ");
        assert!(parsed.stock.quote.is_none());
        assert!(parsed.stock.company_name.is_none());
    }
}
