//! `crossline scan`: one fetch-match-render pass.

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::info;

use crossline_arbitrage_cross::{ArbitrageScanner, ScanReport};
use crossline_core::{AppConfig, KalshiNoPrice, MatchConfig, StakeSizer};

use crate::presenter::render_report;
use crate::sources::{self, SourceArgs};

/// Kalshi "no" price source, as a flag value.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPriceArg {
    /// Quoted no ask.
    NoAsk,
    /// 100 minus the yes ask.
    InverseYesAsk,
}

impl From<NoPriceArg> for KalshiNoPrice {
    fn from(arg: NoPriceArg) -> Self {
        match arg {
            NoPriceArg::NoAsk => Self::NoAsk,
            NoPriceArg::InverseYesAsk => Self::InverseYesAsk,
        }
    }
}

/// Threshold overrides. Unset flags keep the configured value.
#[derive(Args, Debug, Clone, Default)]
pub struct ThresholdArgs {
    /// Maximum hours between the two events' times (1-48).
    #[arg(long)]
    pub time_window_hours: Option<f64>,

    /// Maximum yes-price difference in percentage points (5-40).
    #[arg(long)]
    pub odds_tolerance_pct: Option<f64>,

    /// Minimum name similarity score (10-95).
    #[arg(long)]
    pub name_threshold: Option<u8>,

    /// How the Kalshi "no" price is derived.
    #[arg(long, value_enum)]
    pub kalshi_no_price: Option<NoPriceArg>,

    /// Disable the "st" -> "state" name variant.
    #[arg(long)]
    pub no_state_expansion: bool,
}

impl ThresholdArgs {
    /// Applies the overrides on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: MatchConfig) -> MatchConfig {
        if let Some(hours) = self.time_window_hours {
            config = config.with_time_window_hours(hours);
        }
        if let Some(pct) = self.odds_tolerance_pct {
            config = config.with_odds_tolerance_pct(pct);
        }
        if let Some(threshold) = self.name_threshold {
            config = config.with_name_match_threshold(threshold);
        }
        if let Some(source) = self.kalshi_no_price {
            config = config.with_kalshi_no_price(source.into());
        }
        if self.no_state_expansion {
            config.expand_state_abbreviation = false;
        }
        config
    }
}

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    #[command(flatten)]
    pub sources: SourceArgs,

    /// Number of ranked results to show.
    #[arg(long, default_value = "5")]
    pub top: usize,

    /// Show every matched pair instead of the top N.
    #[arg(long)]
    pub all: bool,
}

impl ScanArgs {
    fn limit(&self) -> Option<usize> {
        if self.all {
            None
        } else {
            Some(self.top)
        }
    }
}

/// Loads both sources and scans them with the effective thresholds.
///
/// # Errors
/// Returns an error if the effective thresholds are out of range.
pub async fn scan_once(config: &AppConfig, args: &ScanArgs) -> Result<ScanReport> {
    let matching = args.thresholds.apply(config.matching.clone());
    let scanner = ArbitrageScanner::new(matching)?;

    let data = sources::load(config, &args.sources).await;
    Ok(scanner.scan_sources(&data.events, &data.markets))
}

/// Runs one scan and prints the ranked results.
pub async fn run_scan(config: &AppConfig, args: &ScanArgs) -> Result<()> {
    let sizer = StakeSizer::from_config(&config.sizing)?;
    let matching = args.thresholds.apply(config.matching.clone());
    info!(
        time_window_hours = matching.time_window_hours,
        odds_tolerance_pct = matching.odds_tolerance_pct,
        name_threshold = matching.name_match_threshold,
        "Scanning"
    );

    let report = scan_once(config, args).await?;
    print!("{}", render_report(&report, args.limit(), &sizer));
    Ok(())
}
