//! Kalshi public market data client with rate limiting.
//!
//! Only unauthenticated endpoints are used. Requests are throttled with the
//! governor crate.
//!
//! # Example
//!
//! ```no_run
//! use crossline_kalshi::{KalshiClient, KalshiClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = KalshiClient::new(KalshiClientConfig::default())?;
//!
//!     let markets = client
//!         .get_series_markets(200, "open", "KXCBB", "College Basketball")
//!         .await?;
//!     println!("Found {} college basketball markets", markets.len());
//!
//!     Ok(())
//! }
//! ```

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::{KalshiError, Result};
use crate::types::{Market, MarketStatus};

/// Kalshi public API base URL.
pub const KALSHI_PUBLIC_URL: &str = "https://api.elections.kalshi.com/trade-api/v2";

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Connection settings for [`KalshiClient`].
#[derive(Debug, Clone)]
pub struct KalshiClientConfig {
    pub base_url: String,
    pub requests_per_minute: NonZeroU32,
    pub timeout_secs: u64,
}

impl Default for KalshiClientConfig {
    fn default() -> Self {
        Self {
            base_url: KALSHI_PUBLIC_URL.to_string(),
            requests_per_minute: nonzero!(60u32),
            timeout_secs: 30,
        }
    }
}

impl KalshiClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Per-request timeout. A zero setting is raised to one second.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// One `/markets` page. Records stay as JSON values so a single bad
/// market is dropped instead of failing the page.
#[derive(Debug, Deserialize)]
struct MarketsPage {
    #[serde(default)]
    markets: Option<Vec<serde_json::Value>>,
}

/// A market record as served. Prices are integer cents.
#[derive(Debug, Deserialize)]
struct RawMarket {
    ticker: String,
    #[serde(default)]
    event_ticker: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    yes_bid: Option<i64>,
    #[serde(default)]
    yes_ask: Option<i64>,
    #[serde(default)]
    no_bid: Option<i64>,
    #[serde(default)]
    no_ask: Option<i64>,
    #[serde(default)]
    last_price: Option<i64>,
    #[serde(default)]
    volume_24h: Option<i64>,
    #[serde(default)]
    close_time: Option<String>,
}

impl From<RawMarket> for Market {
    fn from(raw: RawMarket) -> Self {
        let cents = |v: Option<i64>| v.map(Decimal::from);
        Self {
            ticker: raw.ticker,
            event_ticker: raw.event_ticker.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            subtitle: raw.subtitle,
            status: MarketStatus::from_api(raw.status.as_deref()),
            yes_bid: cents(raw.yes_bid),
            yes_ask: cents(raw.yes_ask),
            no_bid: cents(raw.no_bid),
            no_ask: cents(raw.no_ask),
            last_price: cents(raw.last_price),
            volume_24h: raw.volume_24h,
            close_time: raw.close_time,
        }
    }
}

/// Rate-limited reader for Kalshi's public markets endpoint.
pub struct KalshiClient {
    config: KalshiClientConfig,
    http: Client,
    limiter: DirectLimiter,
}

impl std::fmt::Debug for KalshiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl KalshiClient {
    /// # Errors
    /// Returns [`KalshiError::ClientSetup`] if the HTTP client cannot be built.
    pub fn new(config: KalshiClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| KalshiError::ClientSetup(e.to_string()))?;
        let limiter = RateLimiter::direct(Quota::per_minute(config.requests_per_minute));

        Ok(Self {
            config,
            http,
            limiter,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn fetch_page(&self, limit: u32, status: &str) -> Result<MarketsPage> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, markets_path(limit, status));
        debug!(%url, "Requesting Kalshi markets");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let header = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok());
                Err(KalshiError::rate_limited(header))
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(KalshiError::from_status(status.as_u16(), body))
            }
            _ => {
                let bytes = response.bytes().await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
        }
    }

    /// Fetches one page of markets in `status` (e.g. `"open"`).
    ///
    /// Kalshi caps `limit` at 1000. Only the first page is read.
    ///
    /// # Errors
    /// Fails on transport errors, non-success statuses, or a body that is
    /// not a markets object.
    pub async fn get_markets(&self, limit: u32, status: &str) -> Result<Vec<Market>> {
        let page = self.fetch_page(limit, status).await?;
        let markets = decode_markets(page);
        debug!(decoded = markets.len(), status, "Fetched Kalshi markets");
        Ok(markets)
    }

    /// Like [`get_markets`](Self::get_markets), keeping only markets whose
    /// ticker contains `ticker_fragment` or whose title contains
    /// `title_keyword`.
    ///
    /// # Errors
    /// Same as [`get_markets`](Self::get_markets).
    pub async fn get_series_markets(
        &self,
        limit: u32,
        status: &str,
        ticker_fragment: &str,
        title_keyword: &str,
    ) -> Result<Vec<Market>> {
        let mut markets = self.get_markets(limit, status).await?;
        let total = markets.len();
        markets.retain(|m| m.matches_series(ticker_fragment, title_keyword));

        debug!(
            total,
            kept = markets.len(),
            ticker_fragment,
            "Filtered Kalshi markets to series"
        );
        Ok(markets)
    }
}

/// Parses a saved `/markets` body (`{"markets": [...]}`), skipping bad
/// records exactly as a live fetch does.
///
/// # Errors
/// Returns [`KalshiError::Decode`] if `json` is not a markets object.
pub fn parse_markets(json: &str) -> Result<Vec<Market>> {
    let page: MarketsPage = serde_json::from_str(json)?;
    Ok(decode_markets(page))
}

fn decode_markets(page: MarketsPage) -> Vec<Market> {
    let raw = page.markets.unwrap_or_default();
    let fetched = raw.len();

    let markets: Vec<Market> = raw
        .into_iter()
        .filter_map(|value| {
            serde_json::from_value::<RawMarket>(value)
                .map(Market::from)
                .map_err(|e| debug!(error = %e, "Skipping undecodable Kalshi market"))
                .ok()
        })
        .collect();

    if markets.len() < fetched {
        debug!(fetched, skipped = fetched - markets.len(), "Dropped undecodable Kalshi markets");
    }
    markets
}

fn markets_path(limit: u32, status: &str) -> String {
    format!("/markets?limit={limit}&status={status}")
}
