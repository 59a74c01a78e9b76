//! `crossline match`: best counterpart for one title.

use anyhow::Result;
use clap::{Args, ValueEnum};

use crossline_arbitrage_cross::{ArbitrageScanner, Scorer};
use crossline_core::AppConfig;

use crate::sources::{self, SourceArgs};

/// Which source the title is looked up in.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Against {
    Kalshi,
    Polymarket,
}

/// Arguments for the match command.
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Title to look up.
    pub title: String,

    /// Source to search.
    #[arg(long, value_enum, default_value = "kalshi")]
    pub against: Against,

    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Formats the best match line.
#[must_use]
pub fn describe<S: Scorer>(
    scanner: &ArbitrageScanner<S>,
    title: &str,
    candidates: &[String],
) -> String {
    match scanner.best_match(title, candidates) {
        Some((best, score)) => {
            let verdict = if score >= scanner.config().name_match_threshold {
                "match"
            } else {
                "below threshold"
            };
            format!("{title:?} -> {best:?} (score {score}, {verdict})")
        }
        None => format!("{title:?} -> no candidates"),
    }
}

/// Loads the chosen source and prints the best counterpart for the title.
pub async fn run_match(config: &AppConfig, args: &MatchArgs) -> Result<()> {
    let scanner = ArbitrageScanner::new(config.matching.clone())?;
    let data = sources::load(config, &args.sources).await;

    let candidates: Vec<String> = match args.against {
        Against::Kalshi => data.markets.iter().map(|m| m.title.clone()).collect(),
        Against::Polymarket => data
            .events
            .iter()
            .filter_map(|e| e.title.clone())
            .collect(),
    };

    println!("{}", describe(&scanner, &args.title, &candidates));
    Ok(())
}
