//! Loading both sources, live or from saved payloads.
//!
//! An unavailable source is logged and treated as empty so a scan always
//! completes.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use nonzero_ext::nonzero;
use tracing::{info, warn};

use crossline_core::{AppConfig, KalshiConfig, PolymarketConfig};
use crossline_kalshi::{parse_markets, KalshiClient, KalshiClientConfig, KalshiError, Market};
use crossline_polymarket::{parse_events, GammaClient, GammaEvent};

/// Where to read source data from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read Polymarket events from a saved `/events` JSON body instead of fetching.
    #[arg(long)]
    pub poly_file: Option<PathBuf>,

    /// Read Kalshi markets from a saved `/markets` JSON body instead of fetching.
    #[arg(long)]
    pub kalshi_file: Option<PathBuf>,
}

/// Raw records from both sources.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub events: Vec<GammaEvent>,
    pub markets: Vec<Market>,
}

/// Loads both sources concurrently.
pub async fn load(config: &AppConfig, args: &SourceArgs) -> SourceData {
    let (events, markets) = tokio::join!(
        load_polymarket(&config.polymarket, args.poly_file.as_deref()),
        load_kalshi(&config.kalshi, args.kalshi_file.as_deref()),
    );

    let events = events.unwrap_or_else(|e| {
        warn!(error = %e, "Polymarket unavailable, continuing with no events");
        Vec::new()
    });
    let markets = markets.unwrap_or_else(|e| {
        let (retryable, retry_after) = kalshi_failure(&e);
        warn!(
            error = %e,
            retryable,
            retry_after_secs = retry_after.map(|d| d.as_secs()),
            "Kalshi unavailable, continuing with no markets"
        );
        Vec::new()
    });

    info!(
        polymarket_events = events.len(),
        kalshi_markets = markets.len(),
        "Sources loaded"
    );

    SourceData { events, markets }
}

/// Whether a failed Kalshi load may recover on a later scan, and how long
/// Kalshi asked us to wait.
fn kalshi_failure(err: &anyhow::Error) -> (bool, Option<Duration>) {
    match err.downcast_ref::<KalshiError>() {
        Some(e) => (e.is_retryable(), e.retry_after()),
        None => (false, None),
    }
}

fn request_timeout(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

fn rate_limit(requests_per_minute: u32) -> NonZeroU32 {
    NonZeroU32::new(requests_per_minute).unwrap_or(nonzero!(1u32))
}

async fn load_polymarket(config: &PolymarketConfig, file: Option<&Path>) -> Result<Vec<GammaEvent>> {
    if let Some(path) = file {
        let body = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        return parse_events(&body);
    }

    let client = GammaClient::with_rate_limit(rate_limit(config.requests_per_minute))
        .with_base_url(config.gamma_url.clone())
        .with_timeout(request_timeout(config.timeout_secs))?;
    client.get_events_by_tag(&config.tag_id).await
}

async fn load_kalshi(config: &KalshiConfig, file: Option<&Path>) -> Result<Vec<Market>> {
    let markets = if let Some(path) = file {
        let body = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_markets(&body)?
            .into_iter()
            .filter(|m| m.matches_series(&config.series_prefix, &config.title_keyword))
            .collect()
    } else {
        let client = KalshiClient::new(
            KalshiClientConfig::default()
                .with_base_url(config.base_url.clone())
                .with_rate_limit(rate_limit(config.requests_per_minute))
                .with_timeout_secs(config.timeout_secs),
        )?;
        client
            .get_series_markets(
                config.limit,
                &config.status,
                &config.series_prefix,
                &config.title_keyword,
            )
            .await?
    };
    Ok(markets)
}
