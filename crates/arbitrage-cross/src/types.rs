//! Shared types for cross-exchange matching.
//!
//! Every price here is on the common fractional-dollar scale (0.0-1.0).
//! Source-specific scales are converted in [`crate::sources`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Exchange Identifiers
// =============================================================================

/// Identifies which exchange a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// Kalshi prediction market.
    Kalshi,
    /// Polymarket (Gamma API).
    Polymarket,
}

impl Exchange {
    /// Returns the display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kalshi => "Kalshi",
            Self::Polymarket => "Polymarket",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Market Events
// =============================================================================

/// One market from either source, scale-normalized.
///
/// `yes_price + no_price` need not equal 1.0; a quoted spread is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Source exchange.
    pub exchange: Exchange,
    /// Source identifier (condition id or ticker).
    pub id: String,
    /// Free-text title as served by the source.
    pub title: String,
    /// Cost of a "yes" share, 0.0-1.0.
    pub yes_price: Decimal,
    /// Cost of a "no" share, 0.0-1.0.
    pub no_price: Decimal,
    /// Start time (Polymarket) or close time (Kalshi), if known.
    pub event_time: Option<DateTime<Utc>>,
}

impl MarketEvent {
    /// Creates an event without a timestamp.
    #[must_use]
    pub fn new(
        exchange: Exchange,
        id: impl Into<String>,
        title: impl Into<String>,
        yes_price: Decimal,
        no_price: Decimal,
    ) -> Self {
        Self {
            exchange,
            id: id.into(),
            title: title.into(),
            yes_price,
            no_price,
            event_time: None,
        }
    }

    /// Sets the event time.
    #[must_use]
    pub fn with_event_time(mut self, time: DateTime<Utc>) -> Self {
        self.event_time = Some(time);
        self
    }
}

// =============================================================================
// Results
// =============================================================================

/// A matched pair priced as "yes on A, no on B".
///
/// Produced for every pair that survives the filter pipeline, whether or
/// not it is a true arbitrage, so near misses can be ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageResult {
    pub title_a: String,
    pub title_b: String,
    pub id_a: String,
    pub id_b: String,
    /// Yes price paid on source A.
    pub yes_price_a: Decimal,
    /// No price paid on source B.
    pub no_price_b: Decimal,
    /// Best name similarity across both variant sets (0-100).
    pub match_score: u8,
    /// `yes_price_a + no_price_b`.
    pub total_cost: Decimal,
    /// `(1 - total_cost) / total_cost * 100`. Negative for losing pairs.
    pub profit_pct: Decimal,
    /// True when `total_cost < 1`.
    pub is_arb: bool,
}

/// The filter gate that rejected a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    /// Event times too far apart.
    TimeWindow,
    /// Yes prices too far apart for a non-arbitrage pair.
    OddsSymmetry,
    /// Titles not similar enough.
    NameMatch,
}

impl Gate {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeWindow => "time_window",
            Self::OddsSymmetry => "odds_symmetry",
            Self::NameMatch => "name_match",
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate diagnostics for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Source A records that could not be converted.
    pub skipped_a: usize,
    /// Source B records that could not be converted.
    pub skipped_b: usize,
    /// Pairs taken from the cross product.
    pub pairs_attempted: usize,
    pub rejected_time: usize,
    pub rejected_odds: usize,
    pub rejected_name: usize,
    /// Pairs that passed every gate but could not be priced.
    pub malformed_pairs: usize,
    /// Result records produced.
    pub results: usize,
    /// Results with `is_arb`.
    pub arbitrages: usize,
}

impl ScanSummary {
    /// Records a gate rejection.
    pub fn record_rejection(&mut self, gate: Gate) {
        match gate {
            Gate::TimeWindow => self.rejected_time += 1,
            Gate::OddsSymmetry => self.rejected_odds += 1,
            Gate::NameMatch => self.rejected_name += 1,
        }
    }

    /// Total pairs rejected by any gate.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected_time + self.rejected_odds + self.rejected_name
    }
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pairs: {} results ({} arb), rejected time={} odds={} name={}, malformed={}, skipped A={} B={}",
            self.pairs_attempted,
            self.results,
            self.arbitrages,
            self.rejected_time,
            self.rejected_odds,
            self.rejected_name,
            self.malformed_pairs,
            self.skipped_a,
            self.skipped_b,
        )
    }
}
