//! API client for communicating with the Tradium trading backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the REST API: login, market data, portfolio and
//! position reads, order history, transfers, and trade execution.
//!
//! Every authenticated call resolves the bearer token before any network
//! I/O; a missing token short-circuits to `ApiError::NotAuthenticated`
//! rather than sending a request with an empty credential.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    Order, OrdersResponse, Portfolio, PortfolioResponse, PortfolioSummary, Position,
    PositionSummary, ResetPasswordRequest, ServerMessage, Stock, StockResponse, TradeRequest,
    Transfer, UserProfile, Watchlist,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Number of retries for idempotent GET requests that fail in transport.
/// Writes are never retried.
const GET_RETRY_LIMIT: u32 = 1;

/// Delay before the single GET retry.
const RETRY_DELAY_MS: u64 = 500;

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// API client for the Tradium backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token (logout / session invalidation)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Authenticate and return the issued credential pair.
    /// The caller is responsible for persisting it via the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        Self::decode(response).await
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::NotAuthenticated)
    }

    /// Parse a successful response body, or map the failure status into the
    /// error taxonomy.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Check a response status, discarding the body on success.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Authenticated GET with a single retry on transport failure.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            match self.client.get(&url).bearer_auth(token).send().await {
                Ok(response) => return Self::decode(response).await,
                Err(e) if attempt < GET_RETRY_LIMIT => {
                    attempt += 1;
                    warn!(url = %url, error = %e, "GET failed in transport, retrying once");
                    tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Authenticated POST with a JSON body. Never retried.
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Authenticated POST carrying the amount as a query parameter, which is
    /// how the transfer endpoints take their input. Never retried.
    async fn post_amount(&self, path: &str, amount: f64) -> Result<ServerMessage, ApiError> {
        let token = self.bearer()?;
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .query(&[("amount", Self::amount_param(amount))])
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Format an amount for the query string: whole amounts without a
    /// trailing ".0" so `100` goes over the wire as `100`.
    fn amount_param(amount: f64) -> String {
        if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
            format!("{}", amount as i64)
        } else {
            amount.to_string()
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the profile for a user
    pub async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        self.get(&format!("/api/user/{}", user_id)).await
    }

    /// Fetch the market overview and latest quote for a symbol
    pub async fn fetch_stock(&self, symbol: &str) -> Result<Stock, ApiError> {
        let response: StockResponse = self
            .get(&format!("/api/AlphaVantageStockMarket/getStock/{}", symbol))
            .await?;
        Ok(response.stock)
    }

    /// Fetch the full portfolio (available funds plus positions by symbol)
    pub async fn fetch_portfolio(&self, user_id: &str) -> Result<Portfolio, ApiError> {
        let response: PortfolioResponse = self.get(&format!("/api/portfolio/{}", user_id)).await?;
        Ok(response.portfolio)
    }

    /// Fetch the whole-portfolio rollup
    pub async fn fetch_portfolio_summary(
        &self,
        user_id: &str,
    ) -> Result<PortfolioSummary, ApiError> {
        self.get(&format!("/api/portfolio/summary/{}", user_id))
            .await
    }

    /// Fetch the per-symbol position rollup
    pub async fn fetch_position_summary(
        &self,
        user_id: &str,
        symbol: &str,
    ) -> Result<PositionSummary, ApiError> {
        self.get(&format!(
            "/api/Position/{}/get-position-summary/{}",
            user_id, symbol
        ))
        .await
    }

    /// Look up the user's position in one symbol.
    /// Absence of a position (404 or null body) is `None`, not an error.
    pub async fn fetch_position(
        &self,
        user_id: &str,
        symbol: &str,
    ) -> Result<Option<Position>, ApiError> {
        let path = format!("/api/Portfolio/Positions/{}/{}", user_id, symbol);
        match self.get::<Option<Position>>(&path).await {
            Ok(position) => Ok(position),
            Err(ApiError::NotFound(_)) => {
                debug!(symbol, "No existing position");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the order history for a user
    pub async fn fetch_orders(&self, user_id: &str) -> Result<Vec<Order>, ApiError> {
        let response: OrdersResponse = self.get(&format!("/api/order/{}", user_id)).await?;
        Ok(response.orders)
    }

    /// Fetch the cash-flow log for a user
    pub async fn fetch_transfers(&self, user_id: &str) -> Result<Vec<Transfer>, ApiError> {
        self.get(&format!("/api/transfers/{}", user_id)).await
    }

    /// Fetch the user's watchlists
    pub async fn fetch_watchlists(&self, user_id: &str) -> Result<Vec<Watchlist>, ApiError> {
        self.get(&format!("/api/watchlists/{}", user_id)).await
    }

    // ===== Write Methods =====

    /// Execute a trade (buy, sell, short, or close-short)
    pub async fn execute_trade(&self, request: &TradeRequest) -> Result<ServerMessage, ApiError> {
        debug!(symbol = %request.symbol, quantity = request.quantity, order_type = %request.order_type, "Executing trade");
        self.post("/api/Stock/execute-trade", request).await
    }

    /// Deposit funds into the user's account
    pub async fn deposit(&self, user_id: &str, amount: f64) -> Result<ServerMessage, ApiError> {
        self.post_amount(&format!("/api/transfers/{}/deposit", user_id), amount)
            .await
    }

    /// Withdraw funds from the user's account
    pub async fn withdraw(&self, user_id: &str, amount: f64) -> Result<ServerMessage, ApiError> {
        self.post_amount(&format!("/api/transfers/{}/withdraw", user_id), amount)
            .await
    }

    /// Reset the user's password
    pub async fn reset_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let token = self.bearer()?;
        let url = format!("{}/api/user/{}/reset-password", self.base_url, user_id);
        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(&ResetPasswordRequest {
                new_password: new_password.to_string(),
            })
            .send()
            .await?;
        Self::check_status(response).await
    }
}
