//! Failures reading the Kalshi markets feed.

use std::time::Duration;
use thiserror::Error;

/// Fallback wait when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum KalshiError {
    /// Kalshi answered with a non-success status other than 429.
    #[error("Kalshi returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Kalshi rate limit hit, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("request to Kalshi timed out")]
    Timeout,

    /// Connection or transport failure before a response arrived.
    #[error("could not reach Kalshi: {0}")]
    Transport(String),

    /// The markets page was not the expected JSON shape.
    #[error("malformed markets page: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl KalshiError {
    pub(crate) fn from_status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Parses a `Retry-After` header given in whole seconds.
    pub(crate) fn rate_limited(retry_after_header: Option<&str>) -> Self {
        let retry_after = retry_after_header
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(DEFAULT_RETRY_AFTER, Duration::from_secs);
        Self::RateLimited { retry_after }
    }

    /// True when the same request may succeed on a later scan.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout | Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) | Self::ClientSetup(_) => false,
        }
    }

    /// How long the server asked us to back off, if it said.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for KalshiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::ClientSetup(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, KalshiError>;
