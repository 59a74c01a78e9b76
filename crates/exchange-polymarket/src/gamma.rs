//! Gamma API client for tagged event discovery.
//!
//! Pulls the active, unclosed events for one Gamma tag (by default NCAA
//! men's basketball). Only public endpoints are used; no credentials.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;

use crate::models::GammaEvent;

pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Gamma tag id for NCAA men's basketball.
pub const NCAA_BASKETBALL_TAG: &str = "100148";

/// Gamma asks unauthenticated callers to stay well under this.
const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = nonzero!(30u32);

pub struct GammaClient {
    http: Client,
    base_url: String,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl std::fmt::Debug for GammaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Default for GammaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaClient {
    /// Client against the public Gamma host at 30 requests per minute.
    pub fn new() -> Self {
        Self::with_rate_limit(DEFAULT_REQUESTS_PER_MINUTE)
    }

    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        Self {
            http: Client::new(),
            base_url: GAMMA_API_URL.to_string(),
            limiter: RateLimiter::direct(Quota::per_minute(requests_per_minute)),
        }
    }

    /// Rebuilds the HTTP client with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .context("building Gamma HTTP client")?;
        Ok(self)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gets the active, unclosed events carrying `tag_id`.
    ///
    /// Events that fail to deserialize are logged and skipped so one odd
    /// record cannot empty the whole batch.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body is not a JSON array.
    pub async fn get_events_by_tag(&self, tag_id: &str) -> Result<Vec<GammaEvent>> {
        self.limiter.until_ready().await;

        let url = format!(
            "{}/events?tag_id={tag_id}&active=true&closed=false",
            self.base_url
        );
        tracing::debug!(%url, "Requesting Gamma events");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("Gamma API error {status}: {text}");
        }

        let raw: Vec<serde_json::Value> = response
            .json()
            .await
            .context("Gamma /events body is not a JSON array")?;
        let events = decode_events(raw);

        tracing::debug!(tag_id, decoded = events.len(), "Fetched Gamma events");
        Ok(events)
    }
}

/// Parses a saved `/events` response body.
///
/// Undecodable events are skipped the same way as in a live fetch.
///
/// # Errors
/// Returns an error if `json` is not a JSON array.
pub fn parse_events(json: &str) -> Result<Vec<GammaEvent>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(decode_events(raw))
}

fn decode_events(raw: Vec<serde_json::Value>) -> Vec<GammaEvent> {
    let fetched = raw.len();
    let events: Vec<GammaEvent> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<GammaEvent>(value) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping undecodable Gamma event");
                None
            }
        })
        .collect();

    if events.len() < fetched {
        tracing::debug!(
            fetched = fetched,
            skipped = fetched - events.len(),
            "Dropped undecodable Gamma events"
        );
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = GammaClient::new();
        assert_eq!(client.base_url(), GAMMA_API_URL);
    }

    #[test]
    fn test_client_with_base_url() {
        let client = GammaClient::new().with_base_url("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_get_events_by_tag_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events"))
            .and(query_param("tag_id", NCAA_BASKETBALL_TAG))
            .and(query_param("active", "true"))
            .and(query_param("closed", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": "101",
                    "title": "Duke vs. North Carolina",
                    "startDate": "2026-03-07T23:30:00Z",
                    "markets": [{
                        "conditionId": "0xabc123",
                        "question": "Duke vs. North Carolina",
                        "outcomePrices": "[\"0.62\", \"0.38\"]"
                    }]
                },
                {
                    "id": "102",
                    "title": "Kansas vs. Baylor",
                    "markets": []
                }
            ])))
            .mount(&mock_server)
            .await;

        let client = GammaClient::new().with_base_url(mock_server.uri());
        let events = client.get_events_by_tag(NCAA_BASKETBALL_TAG).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title.as_deref(), Some("Duke vs. North Carolina"));
        assert_eq!(events[0].markets.len(), 1);
        assert!(events[0].markets[0].yes_no_prices().is_ok());
    }

    #[tokio::test]
    async fn test_get_events_skips_undecodable_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "title": "Good Event", "markets": [] },
                { "title": 42, "markets": "nope" }
            ])))
            .mount(&mock_server)
            .await;

        let client = GammaClient::new().with_base_url(mock_server.uri());
        let events = client.get_events_by_tag("1").await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Good Event"));
    }

    #[test]
    fn test_parse_events_from_saved_body() {
        let body = r#"[
            {"title": "Duke vs. North Carolina", "markets": [{"outcomePrices": ["0.4", "0.6"]}]},
            "not an event"
        ]"#;
        let events = parse_events(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].markets.len(), 1);

        assert!(parse_events("{}").is_err());
    }

    #[tokio::test]
    async fn test_get_events_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&mock_server)
            .await;

        let client = GammaClient::new().with_base_url(mock_server.uri());
        let result = client.get_events_by_tag("1").await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("503"));
    }
}
