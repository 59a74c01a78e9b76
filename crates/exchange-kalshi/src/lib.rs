//! Kalshi public market data.
//!
//! This crate provides:
//! - A rate-limited REST client for the unauthenticated markets endpoint
//! - Series filtering (ticker fragment or title keyword)
//! - Data models with cent-denominated prices
//!
//! # API Endpoints
//!
//! - `GET /markets?limit={n}&status={status}` - List markets

pub mod client;
pub mod error;
pub mod types;

pub use client::{parse_markets, KalshiClient, KalshiClientConfig, KALSHI_PUBLIC_URL};
pub use error::{KalshiError, Result, DEFAULT_RETRY_AFTER};
pub use types::{Market, MarketStatus};
