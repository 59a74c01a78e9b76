//! Cross-exchange event matching and arbitrage detection.
//!
//! Finds the same college basketball game listed on Polymarket and Kalshi
//! and prices the complementary "yes on one, no on the other" bet.
//!
//! # Overview
//!
//! ```text
//! Polymarket: "Duke vs. North Carolina"   YES @ $0.45
//! Kalshi:     "North Carolina at Duke"    NO  @ $0.50
//!
//!   Total cost:         $0.95
//!   Guaranteed payout:  $1.00
//!   Profit:             5.26% of cost
//! ```
//!
//! A pass runs the full cross product of the two lists:
//!
//! ```text
//! sources ──► MarketEvent ──► FilterPipeline ──► evaluate ──► ArbitrageResult
//!                             (time, odds, name)
//! ```
//!
//! # Modules
//!
//! - [`types`]: Common records, results and scan diagnostics
//! - [`normalizer`]: Noise-word stripping and name variants
//! - [`similarity`]: Pluggable fuzzy scoring
//! - [`filter`]: The three candidate gates
//! - [`evaluator`]: Total cost and profit for a matched pair
//! - [`sources`]: Polymarket and Kalshi record conversion
//! - [`scanner`]: The scan runner and its report
//!
//! # Example
//!
//! ```no_run
//! use crossline_arbitrage_cross::{ArbitrageScanner, Exchange, MarketEvent};
//! use crossline_core::MatchConfig;
//! use rust_decimal_macros::dec;
//!
//! let scanner = ArbitrageScanner::new(MatchConfig::default()).unwrap();
//!
//! let polymarket = vec![MarketEvent::new(
//!     Exchange::Polymarket, "0xabc", "Duke vs. North Carolina", dec!(0.45), dec!(0.56),
//! )];
//! let kalshi = vec![MarketEvent::new(
//!     Exchange::Kalshi, "KXCBBGAME-1", "North Carolina at Duke", dec!(0.52), dec!(0.50),
//! )];
//!
//! let report = scanner.scan(&polymarket, &kalshi);
//! for result in report.top(5) {
//!     println!("{} / {}: {}%", result.title_a, result.title_b, result.profit_pct.round_dp(2));
//! }
//! ```

pub mod error;
pub mod evaluator;
pub mod filter;
pub mod normalizer;
pub mod scanner;
pub mod similarity;
pub mod sources;
pub mod types;

pub use error::RecordError;
pub use evaluator::{evaluate, Evaluation};
pub use filter::{CandidatePair, FilterPipeline, Rejection};
pub use normalizer::{normalize, NameVariantSet, Normalizer, NOISE_WORDS};
pub use scanner::{ArbitrageScanner, ScanReport};
pub use similarity::{similarity, Scorer, TokenSetScorer};
pub use sources::{from_kalshi, from_polymarket, kalshi_market, parse_timestamp, polymarket_market};
pub use types::{ArbitrageResult, Exchange, Gate, MarketEvent, ScanSummary};
