//! Application configuration.
//!
//! Every section carries defaults, so an empty or missing config file yields
//! a usable scanner. Threshold ranges mirror the knobs an operator is
//! expected to tune between scans.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Configuration validation failure.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A numeric setting lies outside its documented range.
    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        /// Dotted field name (e.g. `matching.time_window_hours`).
        field: &'static str,
        /// Offending value, formatted.
        value: String,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// A numeric setting is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Dotted field name.
        field: &'static str,
    },
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Root
// =============================================================================

/// Root configuration for the scanner and its data sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchConfig,
    pub sizing: SizingConfig,
    pub polymarket: PolymarketConfig,
    pub kalshi: KalshiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates every section that carries range constraints.
    ///
    /// # Errors
    /// Returns the first out-of-range field encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching.validate()?;
        self.sizing.validate()?;
        Ok(())
    }
}

// =============================================================================
// Matching
// =============================================================================

/// How the Kalshi "no" price is derived.
///
/// Older scanner builds disagreed here; both are kept so results can be
/// compared side by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KalshiNoPrice {
    /// Use the quoted `no_ask` directly.
    #[default]
    NoAsk,
    /// Use `100 - yes_ask`.
    InverseYesAsk,
}

/// Thresholds for the candidate filter pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum distance between the two events' times, in hours (1-48).
    pub time_window_hours: f64,

    /// Maximum yes-price difference, in percentage points (5-40).
    pub odds_tolerance_pct: f64,

    /// Minimum name similarity score (10-95).
    pub name_match_threshold: u8,

    /// Add a "st" -> "state" expansion to every name variant set.
    pub expand_state_abbreviation: bool,

    /// Source of the Kalshi "no" price.
    pub kalshi_no_price: KalshiNoPrice,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            time_window_hours: 12.0,
            odds_tolerance_pct: 20.0,
            name_match_threshold: 70,
            expand_state_abbreviation: true,
            kalshi_no_price: KalshiNoPrice::NoAsk,
        }
    }
}

impl MatchConfig {
    pub const TIME_WINDOW_RANGE: (f64, f64) = (1.0, 48.0);
    pub const ODDS_TOLERANCE_RANGE: (f64, f64) = (5.0, 40.0);
    pub const NAME_THRESHOLD_RANGE: (u8, u8) = (10, 95);

    /// Sets the time window.
    #[must_use]
    pub fn with_time_window_hours(mut self, hours: f64) -> Self {
        self.time_window_hours = hours;
        self
    }

    /// Sets the odds tolerance.
    #[must_use]
    pub fn with_odds_tolerance_pct(mut self, pct: f64) -> Self {
        self.odds_tolerance_pct = pct;
        self
    }

    /// Sets the name match threshold.
    #[must_use]
    pub fn with_name_match_threshold(mut self, threshold: u8) -> Self {
        self.name_match_threshold = threshold;
        self
    }

    /// Sets the Kalshi "no" price source.
    #[must_use]
    pub fn with_kalshi_no_price(mut self, source: KalshiNoPrice) -> Self {
        self.kalshi_no_price = source;
        self
    }

    /// Checks every threshold against its documented range.
    ///
    /// # Errors
    /// Returns [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = Self::TIME_WINDOW_RANGE;
        check_range("matching.time_window_hours", self.time_window_hours, min, max)?;

        let (min, max) = Self::ODDS_TOLERANCE_RANGE;
        check_range("matching.odds_tolerance_pct", self.odds_tolerance_pct, min, max)?;

        let (min, max) = Self::NAME_THRESHOLD_RANGE;
        check_range(
            "matching.name_match_threshold",
            f64::from(self.name_match_threshold),
            f64::from(min),
            f64::from(max),
        )
    }
}

// =============================================================================
// Sizing
// =============================================================================

/// Bankroll settings for the stake display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Bankroll in dollars.
    pub bankroll: f64,
    /// Fraction of bankroll committed per opportunity, in (0, 1].
    pub stake_fraction: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            bankroll: 1000.0,
            stake_fraction: 0.10,
        }
    }
}

impl SizingConfig {
    /// # Errors
    /// Returns [`ConfigError`] if the bankroll is negative or the fraction
    /// is outside (0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("sizing.bankroll", self.bankroll, 0.0, f64::MAX)?;
        check_range("sizing.stake_fraction", self.stake_fraction, f64::EPSILON, 1.0)
    }
}

// =============================================================================
// Data Sources
// =============================================================================

/// Polymarket Gamma API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolymarketConfig {
    pub gamma_url: String,
    /// Gamma tag id to scan (100148 = NCAA men's basketball).
    pub tag_id: String,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            gamma_url: "https://gamma-api.polymarket.com".to_string(),
            tag_id: "100148".to_string(),
            requests_per_minute: 30,
            timeout_secs: 30,
        }
    }
}

/// Kalshi public market data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalshiConfig {
    pub base_url: String,
    /// Page size for `GET /markets`.
    pub limit: u32,
    /// Market status filter.
    pub status: String,
    /// Ticker fragment identifying the series to keep.
    pub series_prefix: String,
    /// Title fragment identifying the markets to keep.
    pub title_keyword: String,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elections.kalshi.com/trade-api/v2".to_string(),
            limit: 200,
            status: "open".to_string(),
            series_prefix: "KXCBB".to_string(),
            title_keyword: "College Basketball".to_string(),
            requests_per_minute: 60,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
