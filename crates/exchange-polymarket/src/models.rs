//! Gamma API data models.
//!
//! Gamma groups binary markets under events. A college basketball game is
//! one event ("Duke vs. North Carolina") holding one or more markets whose
//! `outcomePrices` are fractional-dollar prices, index 0 = yes, index 1 = no.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A Gamma event with its markets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    /// Event title (e.g. "Duke vs. North Carolina").
    #[serde(default)]
    pub title: Option<String>,
    /// Scheduled start, ISO-8601.
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub markets: Vec<GammaMarket>,
}

/// A binary market inside a Gamma event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub condition_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub outcome_prices: Option<OutcomePrices>,
}

/// `outcomePrices` as served: the live API sends a JSON-encoded string
/// (`"[\"0.55\", \"0.45\"]"`), saved payloads often hold a plain array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutcomePrices {
    List(Vec<PriceField>),
    Encoded(String),
}

/// One outcome price, as a string or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Text(String),
    Number(f64),
}

/// Why a market's outcome prices could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OutcomePriceError {
    #[error("outcomePrices missing")]
    Missing,

    #[error("outcomePrices is not a JSON array: {0}")]
    Encoding(String),

    #[error("outcomePrices has {0} entries, need 2")]
    TooFew(usize),

    #[error("unparseable outcome price: {0}")]
    InvalidPrice(String),
}

impl PriceField {
    fn to_decimal(&self) -> Result<Decimal, OutcomePriceError> {
        match self {
            Self::Text(s) => Decimal::from_str(s.trim())
                .map_err(|_| OutcomePriceError::InvalidPrice(s.clone())),
            Self::Number(n) => {
                Decimal::try_from(*n).map_err(|_| OutcomePriceError::InvalidPrice(n.to_string()))
            }
        }
    }
}

impl OutcomePrices {
    /// Decodes every outcome price in order.
    ///
    /// # Errors
    /// Returns [`OutcomePriceError`] if the encoding or any entry is invalid.
    pub fn decode(&self) -> Result<Vec<Decimal>, OutcomePriceError> {
        let fields = match self {
            Self::List(fields) => fields.clone(),
            Self::Encoded(raw) => serde_json::from_str::<Vec<PriceField>>(raw)
                .map_err(|e| OutcomePriceError::Encoding(e.to_string()))?,
        };
        fields.iter().map(PriceField::to_decimal).collect()
    }
}

impl GammaMarket {
    /// Returns `(yes_price, no_price)` from `outcomePrices[0..2]`.
    ///
    /// # Errors
    /// Returns [`OutcomePriceError`] if prices are missing or unparseable.
    pub fn yes_no_prices(&self) -> Result<(Decimal, Decimal), OutcomePriceError> {
        let prices = self
            .outcome_prices
            .as_ref()
            .ok_or(OutcomePriceError::Missing)?
            .decode()?;

        match prices.as_slice() {
            [yes, no, ..] => Ok((*yes, *no)),
            other => Err(OutcomePriceError::TooFew(other.len())),
        }
    }
}
