//! Arbitrage pricing for a matched pair.
//!
//! Buying "yes" on one exchange and "no" on the other pays exactly 1.0
//! whatever the outcome, so a combined cost under 1.0 is riskless profit
//! before fees and slippage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Cost and return of one "yes on A, no on B" combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub total_cost: Decimal,
    /// Return on cost, in percent. Negative when the pair costs more than
    /// it pays.
    pub profit_pct: Decimal,
    pub is_arb: bool,
}

/// Prices buying yes at `yes_price_a` and no at `no_price_b`.
///
/// # Errors
/// Returns [`RecordError::ZeroTotalCost`] when the combined cost is not
/// positive.
pub fn evaluate(yes_price_a: Decimal, no_price_b: Decimal) -> Result<Evaluation, RecordError> {
    let total_cost = yes_price_a + no_price_b;
    if total_cost <= Decimal::ZERO {
        return Err(RecordError::ZeroTotalCost);
    }

    let profit_pct = (Decimal::ONE - total_cost) / total_cost * Decimal::ONE_HUNDRED;

    Ok(Evaluation {
        total_cost,
        profit_pct,
        is_arb: total_cost < Decimal::ONE,
    })
}
