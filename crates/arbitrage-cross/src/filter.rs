//! Candidate filter pipeline.
//!
//! Each (A, B) pair passes three gates in order and is dropped at the first
//! failure:
//!
//! 1. **Time window**: `|time_a - time_b|` in hours must be `<=` the window.
//!    Skipped when either time is unknown.
//! 2. **Odds symmetry**: `|yes_a - yes_b|` must be within tolerance, unless
//!    `yes_a + no_b < 1`. A real arbitrage is never hidden by this gate.
//! 3. **Name match**: best similarity across both titles' variant sets must
//!    reach the threshold.

use rust_decimal::Decimal;
use tracing::debug;

use crossline_core::{ConfigError, MatchConfig};

use crate::normalizer::Normalizer;
use crate::similarity::{Scorer, TokenSetScorer};
use crate::types::{Gate, MarketEvent};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Why a pair was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    TimeWindow { hours_apart: f64 },
    OddsSymmetry { difference: Decimal },
    NameMatch { score: u8 },
}

impl Rejection {
    /// The gate that produced this rejection.
    #[must_use]
    pub fn gate(&self) -> Gate {
        match self {
            Self::TimeWindow { .. } => Gate::TimeWindow,
            Self::OddsSymmetry { .. } => Gate::OddsSymmetry,
            Self::NameMatch { .. } => Gate::NameMatch,
        }
    }
}

/// A pair that survived every gate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePair<'a> {
    pub a: &'a MarketEvent,
    pub b: &'a MarketEvent,
    /// Best name similarity (0-100).
    pub match_score: u8,
    /// Hours between the two event times, when both are known.
    pub hours_apart: Option<f64>,
}

/// Sequential gates over candidate pairs.
#[derive(Debug, Clone)]
pub struct FilterPipeline<S = TokenSetScorer> {
    config: MatchConfig,
    normalizer: Normalizer,
    scorer: S,
    /// `odds_tolerance_pct` on the 0-1 scale.
    odds_tolerance: Decimal,
}

impl FilterPipeline<TokenSetScorer> {
    /// Creates a pipeline with the default token-set scorer.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any threshold is out of range.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        Self::with_scorer(config, TokenSetScorer)
    }
}

impl<S: Scorer> FilterPipeline<S> {
    /// Creates a pipeline with a custom scorer.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any threshold is out of range.
    pub fn with_scorer(config: MatchConfig, scorer: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let odds_tolerance = Decimal::try_from(config.odds_tolerance_pct)
            .map_err(|_| ConfigError::NotFinite {
                field: "matching.odds_tolerance_pct",
            })?
            / Decimal::ONE_HUNDRED;

        Ok(Self {
            normalizer: Normalizer::from_config(&config),
            config,
            scorer,
            odds_tolerance,
        })
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    #[must_use]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Runs all three gates on `(a, b)`.
    ///
    /// # Errors
    /// Returns the first [`Rejection`] encountered.
    pub fn check<'a>(
        &self,
        a: &'a MarketEvent,
        b: &'a MarketEvent,
    ) -> Result<CandidatePair<'a>, Rejection> {
        let hours_apart = self.time_gate(a, b)?;
        self.odds_gate(a, b)?;
        let match_score = self.name_gate(a, b)?;

        Ok(CandidatePair {
            a,
            b,
            match_score,
            hours_apart,
        })
    }

    fn time_gate(&self, a: &MarketEvent, b: &MarketEvent) -> Result<Option<f64>, Rejection> {
        let (Some(time_a), Some(time_b)) = (a.event_time, b.event_time) else {
            return Ok(None);
        };

        let hours_apart = (time_a - time_b).num_milliseconds().abs() as f64 / MILLIS_PER_HOUR;
        if hours_apart > self.config.time_window_hours {
            debug!(
                title_a = %a.title,
                title_b = %b.title,
                hours_apart = hours_apart,
                window = self.config.time_window_hours,
                "Event times too far apart"
            );
            return Err(Rejection::TimeWindow { hours_apart });
        }

        Ok(Some(hours_apart))
    }

    fn odds_gate(&self, a: &MarketEvent, b: &MarketEvent) -> Result<(), Rejection> {
        if a.yes_price + b.no_price < Decimal::ONE {
            return Ok(());
        }

        let difference = (a.yes_price - b.yes_price).abs();
        if difference > self.odds_tolerance {
            debug!(
                title_a = %a.title,
                title_b = %b.title,
                difference = %difference,
                tolerance = %self.odds_tolerance,
                "Yes prices too far apart"
            );
            return Err(Rejection::OddsSymmetry { difference });
        }

        Ok(())
    }

    fn name_gate(&self, a: &MarketEvent, b: &MarketEvent) -> Result<u8, Rejection> {
        let variants_a = self.normalizer.variants(&a.title);
        let variants_b = self.normalizer.variants(&b.title);
        let score = self.scorer.best_score(&variants_a, &variants_b);

        if score < self.config.name_match_threshold {
            debug!(
                title_a = %a.title,
                title_b = %b.title,
                score = score,
                threshold = self.config.name_match_threshold,
                "Name similarity below threshold"
            );
            return Err(Rejection::NameMatch { score });
        }

        Ok(score)
    }
}
