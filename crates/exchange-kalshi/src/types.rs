//! Data models for Kalshi public market data.
//!
//! Kalshi quotes prices in whole cents (0-100). Conversion to the 0.0-1.0
//! scale happens downstream so these types stay faithful to the wire.

use chrono::{DateTime, ParseError, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Market Types
// =============================================================================

/// A Kalshi market (event contract).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Market ticker (e.g., "KXCBBGAME-26MAR07DUKEUNC-DUKE").
    pub ticker: String,

    /// Event ticker this market belongs to.
    pub event_ticker: String,

    /// Market title/question.
    pub title: String,

    /// Market subtitle (often names the side).
    pub subtitle: Option<String>,

    /// Whether the market is currently open for trading.
    pub status: MarketStatus,

    /// Yes bid price in cents.
    pub yes_bid: Option<Decimal>,

    /// Yes ask price in cents.
    pub yes_ask: Option<Decimal>,

    /// No bid price in cents.
    pub no_bid: Option<Decimal>,

    /// No ask price in cents.
    pub no_ask: Option<Decimal>,

    /// Last trade price in cents.
    pub last_price: Option<Decimal>,

    /// 24h volume in contracts.
    pub volume_24h: Option<i64>,

    /// Market close time as served (ISO-8601).
    pub close_time: Option<String>,
}

impl Market {
    /// Parses `close_time`.
    ///
    /// Returns `None` when the field is absent and `Some(Err(_))` when it is
    /// present but not RFC 3339.
    pub fn close_time_utc(&self) -> Option<Result<DateTime<Utc>, ParseError>> {
        self.close_time.as_deref().map(|raw| {
            DateTime::parse_from_rfc3339(raw.trim()).map(|d| d.with_timezone(&Utc))
        })
    }

    /// Returns true if the title contains `title_keyword` or the ticker
    /// contains `ticker_fragment`. Both checks are case-sensitive.
    #[must_use]
    pub fn matches_series(&self, ticker_fragment: &str, title_keyword: &str) -> bool {
        (!title_keyword.is_empty() && self.title.contains(title_keyword))
            || (!ticker_fragment.is_empty() && self.ticker.contains(ticker_fragment))
    }
}

/// Market status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    /// Market is open for trading.
    Open,
    /// Market is closed (no trading).
    Closed,
    /// Market has settled.
    Settled,
    /// Market is paused.
    Paused,
    /// Status missing or not recognised.
    Unknown,
}

impl MarketStatus {
    /// Maps the API's status string.
    #[must_use]
    pub fn from_api(status: Option<&str>) -> Self {
        match status {
            Some("open") | Some("active") => Self::Open,
            Some("closed") => Self::Closed,
            Some("settled") | Some("finalized") => Self::Settled,
            Some("paused") => Self::Paused,
            _ => Self::Unknown,
        }
    }
}
