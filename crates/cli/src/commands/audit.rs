//! `crossline audit`: raw price audit of both sources.
//!
//! Prints the prices exactly as each source quotes them, before any
//! matching, so scale or feed problems are easy to spot.

use std::fmt::Write;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;

use crossline_core::AppConfig;
use crossline_kalshi::Market;
use crossline_polymarket::GammaEvent;

use crate::sources::{self, SourceArgs};

/// Arguments for the audit command.
#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}

fn cents(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |c| format!("{}c", c.normalize()))
}

/// Polymarket yes price per market, in cents.
#[must_use]
pub fn render_polymarket(events: &[GammaEvent]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Polymarket ({} events) ===", events.len());

    for event in events {
        let title = event.title.as_deref().unwrap_or("<untitled>");
        if event.markets.is_empty() {
            let _ = writeln!(out, "  {title}  (no markets)");
        }
        for market in &event.markets {
            let yes = match market.yes_no_prices() {
                Ok((yes, _)) => format!("{}c", (yes * Decimal::ONE_HUNDRED).normalize()),
                Err(e) => format!("? ({e})"),
            };
            let _ = writeln!(out, "  {title}  YES {yes}");
        }
    }
    out
}

/// Kalshi yes bid and no ask per market, in cents.
#[must_use]
pub fn render_kalshi(markets: &[Market]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Kalshi ({} markets) ===", markets.len());

    for market in markets {
        let _ = writeln!(
            out,
            "  {}  {}  YES bid {}  NO ask {}",
            market.ticker,
            market.title,
            cents(market.yes_bid),
            cents(market.no_ask),
        );
    }
    out
}

/// Loads both sources and prints their raw prices.
pub async fn run_audit(config: &AppConfig, args: &AuditArgs) -> Result<()> {
    let data = sources::load(config, &args.sources).await;
    print!("{}", render_polymarket(&data.events));
    print!("{}", render_kalshi(&data.markets));
    Ok(())
}
