//! Application shell for the Tradium client.
//!
//! This module contains the `App` struct that coordinates the session, the
//! credential store, and the API client. It is the single choke point every
//! screen-level operation passes through: credentials are resolved freshly
//! from the session for each operation (never held in process-wide scratch
//! state), and an auth-rejection outcome from any call clears the stored
//! credentials and settles the session on `Unauthenticated` uniformly.
//!
//! Login and logout take `&mut self`, which serializes them against any
//! interleaved credential read: a login or logout completes fully before
//! another operation can observe the store.

use std::collections::HashMap;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{self, CredentialStore, Session, SessionData, SessionState};
use crate::config::Config;
use crate::models::{
    Order, OrderType, Portfolio, PortfolioSummary, Position, PositionSummary, ServerMessage,
    Stock, TradeRequest, Transfer, UserProfile, Watchlist,
};
use crate::utils::{parse_amount, parse_quantity, validate_password};

/// Maximum concurrent per-symbol summary requests.
/// Bounds the fan-out so a large portfolio does not flood the server.
const MAX_CONCURRENT_REQUESTS: usize = 4;

pub struct App {
    pub config: Config,
    session: Session,
    api: ApiClient,
}

impl App {
    /// Create the shell with the platform credential store and saved config.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let store = auth::platform_store(&Config::credentials_dir()?);
        Self::with_store(config, store)
    }

    /// Create the shell over an explicit credential store.
    pub fn with_store(config: Config, store: Box<dyn CredentialStore>) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url())?;
        Ok(Self {
            config,
            session: Session::new(store),
            api,
        })
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Resolve stored credentials into a settled session state at launch.
    ///
    /// Storage only, no network call: presence of the stored pair gates
    /// navigation into the authenticated area, absence routes to login.
    pub fn resolve_session(&mut self) -> Result<&SessionState> {
        self.session.resolve()?;
        match self.session.token().map(str::to_string) {
            Some(token) => self.api.set_token(token),
            None => self.api.clear_token(),
        }
        Ok(self.session.state())
    }

    /// Authenticate and persist the issued credential pair.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(
                ApiError::ValidationFailure("Username and password required".to_string()).into(),
            );
        }

        let response = self.api.login(username, password).await?;
        self.session.establish(SessionData {
            token: response.token.clone(),
            user_id: response.user_id,
        })?;
        self.api.set_token(response.token);

        self.config.last_username = Some(username.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        info!("Login successful");
        Ok(())
    }

    /// Clear the stored credential pair and drop the client token.
    pub fn logout(&mut self) {
        self.session.clear();
        self.api.clear_token();
        info!("Logged out");
    }

    /// Resolve the current credentials into a request-scoped client.
    /// No stored token means no call is issued at all.
    fn authed(&self) -> Result<(ApiClient, String), ApiError> {
        match self.session.credentials() {
            Some(data) => Ok((
                self.api.with_token(data.token.clone()),
                data.user_id.clone(),
            )),
            None => Err(ApiError::NotAuthenticated),
        }
    }

    /// Session-invalidation interceptor.
    ///
    /// Every authenticated operation funnels its result through here so one
    /// policy governs all screens: a credential rejected by the server means
    /// the stored pair is cleared and the state machine settles on
    /// `Unauthenticated`; the caller routes to the login flow.
    fn intercept<T>(&mut self, result: Result<T, ApiError>) -> Result<T> {
        match result {
            Err(e) if e.is_auth_rejection() => {
                warn!("Server rejected session credentials; clearing session");
                self.session.clear();
                self.api.clear_token();
                Err(e.into())
            }
            other => other.map_err(Into::into),
        }
    }

    // ===== Read Operations =====

    /// Fetch the current user's profile
    pub async fn fetch_profile(&mut self) -> Result<UserProfile> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_user(&user_id).await;
        self.intercept(result)
    }

    /// Look up a stock overview and quote by symbol
    pub async fn fetch_stock(&mut self, symbol: &str) -> Result<Stock> {
        let (api, _) = self.authed()?;
        let result = api.fetch_stock(symbol).await;
        self.intercept(result)
    }

    /// Fetch the current user's portfolio
    pub async fn fetch_portfolio(&mut self) -> Result<Portfolio> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_portfolio(&user_id).await;
        self.intercept(result)
    }

    /// Fetch the whole-portfolio rollup
    pub async fn fetch_portfolio_summary(&mut self) -> Result<PortfolioSummary> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_portfolio_summary(&user_id).await;
        self.intercept(result)
    }

    /// Look up the current user's position in one symbol, if any
    pub async fn fetch_position(&mut self, symbol: &str) -> Result<Option<Position>> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_position(&user_id, symbol).await;
        self.intercept(result)
    }

    /// Fetch per-symbol position rollups with bounded concurrency.
    ///
    /// Symbols without a summary are skipped; an auth rejection on any of
    /// the requests invalidates the session like every other operation.
    pub async fn fetch_position_summaries(
        &mut self,
        symbols: &[String],
    ) -> Result<HashMap<String, PositionSummary>> {
        let (api, user_id) = self.authed()?;

        let results: Vec<(String, Result<PositionSummary, ApiError>)> =
            stream::iter(symbols.to_vec())
                .map(|symbol| {
                    let api = api.clone();
                    let user_id = user_id.clone();
                    async move {
                        let result = api.fetch_position_summary(&user_id, &symbol).await;
                        (symbol, result)
                    }
                })
                .buffer_unordered(MAX_CONCURRENT_REQUESTS)
                .collect()
                .await;

        let mut summaries = HashMap::new();
        for (symbol, result) in results {
            match result {
                Ok(summary) => {
                    summaries.insert(symbol, summary);
                }
                Err(ApiError::NotFound(_)) => {
                    warn!(symbol = %symbol, "No position summary for symbol");
                }
                Err(e) => return self.intercept(Err(e)),
            }
        }
        Ok(summaries)
    }

    /// Fetch the current user's order history
    pub async fn fetch_orders(&mut self) -> Result<Vec<Order>> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_orders(&user_id).await;
        self.intercept(result)
    }

    /// Fetch the current user's cash-flow log
    pub async fn fetch_transfers(&mut self) -> Result<Vec<Transfer>> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_transfers(&user_id).await;
        self.intercept(result)
    }

    /// Fetch the current user's watchlists
    pub async fn fetch_watchlists(&mut self) -> Result<Vec<Watchlist>> {
        let (api, user_id) = self.authed()?;
        let result = api.fetch_watchlists(&user_id).await;
        self.intercept(result)
    }

    // ===== Write Operations =====

    /// Execute a trade. The quantity string is validated locally; a bad
    /// quantity never produces a request.
    pub async fn execute_trade(
        &mut self,
        symbol: &str,
        quantity: &str,
        order_type: OrderType,
    ) -> Result<ServerMessage> {
        let quantity = parse_quantity(quantity)?;
        let (api, _) = self.authed()?;
        let request = TradeRequest {
            symbol: symbol.to_string(),
            quantity,
            order_type,
        };
        let result = api.execute_trade(&request).await;
        self.intercept(result)
    }

    /// Deposit funds. The amount string is validated locally first.
    pub async fn deposit(&mut self, amount: &str) -> Result<ServerMessage> {
        let amount = parse_amount(amount)?;
        let (api, user_id) = self.authed()?;
        let result = api.deposit(&user_id, amount).await;
        self.intercept(result)
    }

    /// Withdraw funds. The amount string is validated locally first.
    pub async fn withdraw(&mut self, amount: &str) -> Result<ServerMessage> {
        let amount = parse_amount(amount)?;
        let (api, user_id) = self.authed()?;
        let result = api.withdraw(&user_id, amount).await;
        self.intercept(result)
    }

    /// Reset the current user's password. Rejects an empty password locally.
    pub async fn reset_password(&mut self, new_password: &str) -> Result<()> {
        let new_password = validate_password(new_password)?.to_string();
        let (api, user_id) = self.authed()?;
        let result = api.reset_password(&user_id, &new_password).await;
        self.intercept(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{FileStore, TOKEN_KEY, USER_ID_KEY};
    use serde_json::json;
    use std::path::Path;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_with_file_store(server: &MockServer, dir: &Path) -> App {
        let config = Config {
            api_base_url: Some(server.uri()),
            last_username: None,
        };
        App::with_store(config, Box::new(FileStore::new(dir))).expect("app")
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "t1", "userId": "u1"})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_persists_pair_and_requests_carry_it() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/portfolio/u1"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "portfolio": {"availableFunds": 8450.25, "positions": {}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");
        assert!(app.is_authenticated());

        // The pair landed in the credential store
        let store = FileStore::new(dir.path());
        assert_eq!(store.get(TOKEN_KEY).expect("get").as_deref(), Some("t1"));
        assert_eq!(store.get(USER_ID_KEY).expect("get").as_deref(), Some("u1"));

        let portfolio = app.fetch_portfolio().await.expect("portfolio");
        assert_eq!(portfolio.available_funds, 8450.25);
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected_before_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        let err = app.login("", "").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::ValidationFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_store_and_next_launch_is_unauthenticated() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");
        app.logout();

        let store = FileStore::new(dir.path());
        assert!(store.get(TOKEN_KEY).expect("get").is_none());
        assert!(store.get(USER_ID_KEY).expect("get").is_none());

        // Relaunch over the same store; resolution is storage-only
        let relaunch_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&relaunch_server)
            .await;
        let mut relaunched = app_with_file_store(&relaunch_server, dir.path());
        assert_eq!(
            *relaunched.resolve_session().expect("resolve"),
            SessionState::Unauthenticated
        );
    }

    #[tokio::test]
    async fn test_auth_rejection_invalidates_session_everywhere() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/order/u1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");

        let err = app.fetch_orders().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::AuthRejected)
        ));

        // One policy for every screen: credentials cleared, state settled
        assert_eq!(*app.session_state(), SessionState::Unauthenticated);
        let store = FileStore::new(dir.path());
        assert!(store.get(TOKEN_KEY).expect("get").is_none());
        assert!(store.get(USER_ID_KEY).expect("get").is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_operation_short_circuits() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.resolve_session().expect("resolve");
        let err = app.fetch_watchlists().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_resolve_to_unauthenticated_drops_stale_token() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");

        // Credentials wiped out from under the shell (e.g. another process
        // logged out); re-resolution must also drop the client's token
        let store = FileStore::new(dir.path());
        store.delete(TOKEN_KEY).expect("delete token");
        store.delete(USER_ID_KEY).expect("delete user id");

        assert_eq!(
            *app.resolve_session().expect("resolve"),
            SessionState::Unauthenticated
        );
        let err = app.fetch_profile().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_transfer_amount_validation_gates_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/transfers/u1/deposit"))
            .and(query_param("amount", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");

        for bad in ["abc", "-5"] {
            let err = app.deposit(bad).await.unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ApiError>(),
                Some(ApiError::ValidationFailure(_))
            ));
        }

        // The valid amount produces exactly one POST (verified by expect(1))
        app.deposit("100").await.expect("deposit");
    }

    #[tokio::test]
    async fn test_trade_quantity_validation_gates_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/Stock/execute-trade"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");

        let err = app
            .execute_trade("AAPL", "0", OrderType::Buy)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::ValidationFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_position_summaries_fan_out() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        mount_login(&server).await;
        for (symbol, pnl) in [("AAPL", 207.7), ("TSLA", -31.2)] {
            Mock::given(method("GET"))
                .and(path(format!(
                    "/api/Position/u1/get-position-summary/{}",
                    symbol
                )))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "symbol": symbol,
                    "quantity": 10,
                    "averagePurchasePrice": 190.5,
                    "currentPrice": 211.27,
                    "marketValue": 2112.7,
                    "totalCost": 1905.0,
                    "openPNL": pnl,
                    "openPNLPercentage": 10.9
                })))
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/api/Position/u1/get-position-summary/GONE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut app = app_with_file_store(&server, dir.path());
        app.login("jo", "hunter2").await.expect("login");

        let symbols: Vec<String> = ["AAPL", "TSLA", "GONE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let summaries = app
            .fetch_position_summaries(&symbols)
            .await
            .expect("summaries");
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries["AAPL"].open_pnl, 207.7);
        assert_eq!(summaries["TSLA"].open_pnl, -31.2);
    }
}
