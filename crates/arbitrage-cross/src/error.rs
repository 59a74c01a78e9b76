//! Per-record failures.
//!
//! None of these abort a scan. A failing record or pair is logged, counted
//! in [`crate::ScanSummary`] and dropped.

use crossline_polymarket::OutcomePriceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a source record or matched pair could not be used.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    /// A required field is absent or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A price could not be parsed.
    #[error("unparseable price: {0}")]
    InvalidPrice(#[from] OutcomePriceError),

    /// A price lies outside [0, 1] after scaling.
    #[error("{field} = {value} is outside [0, 1]")]
    PriceOutOfRange {
        field: &'static str,
        value: Decimal,
    },

    /// A side is quoted at 0 or 100 cents, Kalshi's marker for an empty book.
    #[error("{field} is unquoted ({cents}c)")]
    Unquoted {
        field: &'static str,
        cents: Decimal,
    },

    /// A timestamp is present but not ISO-8601.
    #[error("unparseable timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// The pair costs nothing, so no profit percentage exists.
    #[error("total cost is zero")]
    ZeroTotalCost,
}
