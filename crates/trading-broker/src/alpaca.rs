//! Alpaca broker integration for paper and live trading.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{header, Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use trading_core::error::BrokerError;
use trading_core::traits::Broker;
use trading_core::types::{Fill, OrderRequest, PriceObservation, Side};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
    /// Calendar days of daily bars requested per fetch
    pub bar_lookback_days: i64,
    /// Delay between order status polls
    pub poll_interval: Duration,
    /// How long to wait for a submitted order to settle
    pub fill_timeout: Duration,
}

impl AlpacaConfig {
    /// Create config directly with key and secret.
    pub fn new(api_key: String, api_secret: String, paper: bool) -> Self {
        Self {
            api_key,
            api_secret,
            paper,
            bar_lookback_days: 60,
            poll_interval: Duration::from_millis(500),
            fill_timeout: Duration::from_secs(30),
        }
    }

    /// Read the key and secret from the named environment variables.
    pub fn from_env_vars(key_var: &str, secret_var: &str, paper: bool) -> Result<Self, BrokerError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| BrokerError::Configuration(format!("{} not set", key_var)))?;
        let api_secret = std::env::var(secret_var)
            .map_err(|_| BrokerError::Configuration(format!("{} not set", secret_var)))?;

        Ok(Self::new(api_key, api_secret, paper))
    }

    pub fn with_bar_lookback_days(mut self, days: i64) -> Self {
        self.bar_lookback_days = days;
        self
    }

    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.fill_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        if self.paper {
            "https://paper-api.alpaca.markets"
        } else {
            "https://api.alpaca.markets"
        }
    }

    pub fn data_url(&self) -> &str {
        "https://data.alpaca.markets"
    }
}

#[derive(Debug, Deserialize)]
struct AlpacaAccount {
    equity: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    status: String,
    filled_qty: String,
    filled_avg_price: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    client_order_id: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    c: Decimal,
}

#[derive(Debug, Deserialize)]
struct AlpacaBarsResponse {
    bars: Option<Vec<AlpacaBar>>,
    next_page_token: Option<String>,
}

/// Where a polled order stands.
#[derive(Debug, PartialEq)]
enum OrderState {
    /// Done, with this much executed
    Settled(Fill),
    /// Done without executing anything
    Dead(String),
    /// Still working; carries any partial fill so far
    Working(Option<Fill>),
}

impl AlpacaOrder {
    fn state(&self, side: Side) -> Result<OrderState, BrokerError> {
        let filled: Decimal = self
            .filled_qty
            .parse()
            .map_err(|_| BrokerError::ApiError(format!("bad filled_qty: {}", self.filled_qty)))?;

        let fill = if filled > Decimal::ZERO {
            let price: Decimal = self
                .filled_avg_price
                .as_deref()
                .ok_or_else(|| BrokerError::ApiError("fill without filled_avg_price".into()))?
                .parse()
                .map_err(|_| BrokerError::ApiError("bad filled_avg_price".into()))?;
            Some(Fill::new(filled * side.sign(), price))
        } else {
            None
        };

        let terminal = matches!(
            self.status.as_str(),
            "filled" | "canceled" | "expired" | "rejected" | "done_for_day" | "stopped"
        );

        Ok(match (terminal, fill) {
            (true, Some(fill)) => OrderState::Settled(fill),
            (true, None) => OrderState::Dead(self.status.clone()),
            (false, fill) => OrderState::Working(fill),
        })
    }
}

/// Alpaca broker client.
pub struct AlpacaBroker {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaBroker {
    /// Create a new Alpaca broker client.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }
}

/// Order status and cancellation calls used while waiting for a fill.
#[async_trait]
trait OrderDesk {
    async fn get_order(&self, order_id: &str) -> Result<AlpacaOrder, BrokerError>;
    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError>;
}

#[async_trait]
impl OrderDesk for AlpacaBroker {
    async fn get_order(&self, order_id: &str) -> Result<AlpacaOrder, BrokerError> {
        let url = format!("{}/v2/orders/{}", self.config.base_url(), order_id);
        let resp = self.client.get(&url).send().await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        let resp = check_status(resp).await?;
        resp.json().await.map_err(|e| BrokerError::ApiError(e.to_string()))
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), BrokerError> {
        let url = format!("{}/v2/orders/{}", self.config.base_url(), order_id);
        let resp = self.client.delete(&url).send().await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        check_status(resp).await?;
        info!("Order canceled: {}", order_id);
        Ok(())
    }
}

/// Poll an accepted order until it settles or `timeout` passes.
///
/// If the order's status cannot be read, the order is canceled and read
/// once more. When its outcome is still unknown the result is
/// [`BrokerError::OrderUnresolved`].
async fn await_fill<D: OrderDesk + ?Sized>(
    desk: &D,
    order_id: &str,
    side: Side,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<Fill, BrokerError> {
    let deadline = Instant::now() + timeout;

    loop {
        let state = match desk.get_order(order_id).await.and_then(|o| o.state(side)) {
            Ok(state) => state,
            Err(e) => {
                warn!(order_id, error = %e, "lost track of accepted order, canceling");
                return abandon(desk, order_id, side, e).await;
            }
        };

        match state {
            OrderState::Settled(fill) => return Ok(fill),
            OrderState::Dead(status) => {
                return Err(BrokerError::OrderRejected(format!(
                    "order {} {} without filling",
                    order_id, status
                )));
            }
            OrderState::Working(partial) if Instant::now() >= deadline => {
                if let Err(e) = desk.cancel_order(order_id).await {
                    warn!(order_id, error = %e, "failed to cancel unsettled order");
                }
                return partial.ok_or_else(|| {
                    BrokerError::OrderRejected(format!(
                        "order {} not filled within {:?}",
                        order_id, timeout
                    ))
                });
            }
            OrderState::Working(_) => tokio::time::sleep(poll_interval).await,
        }
    }
}

/// Cancel an order whose status read failed, then settle what it executed.
async fn abandon<D: OrderDesk + ?Sized>(
    desk: &D,
    order_id: &str,
    side: Side,
    cause: BrokerError,
) -> Result<Fill, BrokerError> {
    if let Err(e) = desk.cancel_order(order_id).await {
        warn!(order_id, error = %e, "failed to cancel order after lost status");
    }

    match desk.get_order(order_id).await.and_then(|o| o.state(side)) {
        Ok(OrderState::Settled(fill)) => Ok(fill),
        Ok(OrderState::Dead(status)) => Err(BrokerError::OrderRejected(format!(
            "order {} {} without filling",
            order_id, status
        ))),
        Ok(OrderState::Working(_)) | Err(_) => Err(BrokerError::OrderUnresolved(format!(
            "order {}: {}",
            order_id, cause
        ))),
    }
}

async fn check_status(resp: Response) -> Result<Response, BrokerError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(BrokerError::ApiError(format!("{}: {}", status, text)))
}

fn parse_bar(symbol: &str, bar: AlpacaBar) -> Result<PriceObservation, BrokerError> {
    let timestamp = DateTime::parse_from_rfc3339(&bar.t)
        .map_err(|e| BrokerError::ApiError(format!("bad bar timestamp {}: {}", bar.t, e)))?
        .with_timezone(&Utc);
    Ok(PriceObservation::new(symbol, timestamp, bar.c))
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn get_historical_bars(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, BrokerError> {
        let url = format!("{}/v2/stocks/{}/bars", self.config.data_url(), symbol);
        let start = (Utc::now() - ChronoDuration::days(self.config.bar_lookback_days)).to_rfc3339();

        let mut observations = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("timeframe", "1Day".to_string()),
                ("start", start.clone()),
                ("feed", "iex".to_string()),
                ("adjustment", "raw".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("page_token", token.clone()));
            }

            let resp = self.client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| BrokerError::Connection(e.to_string()))?;

            if matches!(resp.status(), StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY) {
                return Err(BrokerError::InvalidSymbol(symbol.to_string()));
            }
            let resp = check_status(resp).await?;

            let data: AlpacaBarsResponse = resp.json().await
                .map_err(|e| BrokerError::ApiError(e.to_string()))?;

            for bar in data.bars.unwrap_or_default() {
                observations.push(parse_bar(symbol, bar)?);
            }

            match data.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        if observations.is_empty() {
            return Err(BrokerError::InvalidSymbol(symbol.to_string()));
        }

        observations.sort_by_key(|o| o.timestamp);
        debug!(symbol, bars = observations.len(), "fetched daily bars");
        Ok(observations)
    }

    async fn get_account_equity(&self) -> Result<Decimal, BrokerError> {
        let url = format!("{}/v2/account", self.config.base_url());

        let resp = self.client.get(&url).send().await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;
        let resp = check_status(resp).await?;

        let account: AlpacaAccount = resp.json().await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        account
            .equity
            .parse()
            .map_err(|_| BrokerError::ApiError(format!("bad equity: {}", account.equity)))
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<Fill, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());
        let side = request.side();

        let create_req = CreateOrderRequest {
            symbol: request.symbol.clone(),
            qty: request.quantity().to_string(),
            side: match side { Side::Buy => "buy", Side::Sell => "sell" }.to_string(),
            order_type: "market".to_string(),
            time_in_force: "day".to_string(),
            client_order_id: Uuid::new_v4().to_string(),
        };

        debug!("Submitting order: {:?}", create_req);

        let resp = self.client.post(&url).json(&create_req).send().await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::OrderRejected(format!("{}: {}", status, text)));
        }

        let order: AlpacaOrder = resp.json().await
            .map_err(|e| BrokerError::ApiError(e.to_string()))?;

        info!("Order submitted: {} {} {} ({})", create_req.side, create_req.qty, create_req.symbol, order.id);
        await_fill(
            self,
            &order.id,
            side,
            self.config.poll_interval,
            self.config.fill_timeout,
        )
        .await
    }

    fn name(&self) -> &str {
        if self.config.paper { "Alpaca Paper" } else { "Alpaca Live" }
    }
}
