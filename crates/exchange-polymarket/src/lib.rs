//! Polymarket Gamma API integration.
//!
//! This crate provides:
//! - Models for Gamma events and their binary markets
//! - Decoding of `outcomePrices` in both served encodings
//! - A rate-limited client for tagged event discovery
//!
//! # Example
//!
//! ```no_run
//! use crossline_polymarket::{GammaClient, NCAA_BASKETBALL_TAG};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GammaClient::new();
//!     let events = client.get_events_by_tag(NCAA_BASKETBALL_TAG).await?;
//!     println!("Fetched {} events", events.len());
//!     Ok(())
//! }
//! ```

pub mod gamma;
pub mod models;

pub use gamma::{parse_events, GammaClient, GAMMA_API_URL, NCAA_BASKETBALL_TAG};
pub use models::{GammaEvent, GammaMarket, OutcomePriceError, OutcomePrices, PriceField};
