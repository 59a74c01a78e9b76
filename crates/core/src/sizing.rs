//! Stake sizing for a complementary two-leg position.
//!
//! Buying one "yes" share on one exchange and one "no" share on the other
//! pays exactly $1.00 whatever the outcome. Sizing therefore reduces to
//! choosing how many such pairs a stake buys:
//!
//! ```text
//! contracts = stake / (yes_price + no_price)
//! payout    = contracts * 1.00
//! profit    = payout - stake
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SizingConfig};

/// Sizes stakes as a fixed fraction of a bankroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeSizer {
    /// Bankroll to size against.
    pub bankroll: Decimal,
    /// Fraction of bankroll committed per opportunity.
    pub stake_fraction: Decimal,
}

/// Recommended stake split across the two legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakePlan {
    /// Total dollars committed.
    pub stake: Decimal,
    /// Number of yes/no pairs bought.
    pub contracts: Decimal,
    /// Dollars spent on the "yes" leg.
    pub yes_leg_cost: Decimal,
    /// Dollars spent on the "no" leg.
    pub no_leg_cost: Decimal,
    /// Payout regardless of outcome.
    pub guaranteed_payout: Decimal,
    /// Payout minus stake. Negative when the pair costs more than $1.00.
    pub guaranteed_profit: Decimal,
}

impl Default for StakeSizer {
    fn default() -> Self {
        Self {
            bankroll: Decimal::new(1000, 0),
            stake_fraction: Decimal::new(10, 2),
        }
    }
}

impl StakeSizer {
    #[must_use]
    pub fn new(bankroll: Decimal, stake_fraction: Decimal) -> Self {
        Self {
            bankroll,
            stake_fraction,
        }
    }

    /// Builds a sizer from validated configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the configuration is out of range.
    pub fn from_config(config: &SizingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bankroll = Decimal::try_from(config.bankroll).map_err(|_| ConfigError::NotFinite {
            field: "sizing.bankroll",
        })?;
        let stake_fraction =
            Decimal::try_from(config.stake_fraction).map_err(|_| ConfigError::NotFinite {
                field: "sizing.stake_fraction",
            })?;
        Ok(Self::new(bankroll, stake_fraction))
    }

    /// Returns the stake committed to each opportunity, or `None` on overflow.
    #[must_use]
    pub fn stake(&self) -> Option<Decimal> {
        self.bankroll.checked_mul(self.stake_fraction)
    }

    /// Plans a position buying "yes" at `yes_price` and "no" at `no_price`
    /// (both on the 0.0-1.0 scale).
    ///
    /// Returns `None` when the pair has no positive cost, there is nothing
    /// to stake, or the plan does not fit in a `Decimal`.
    #[must_use]
    pub fn plan(&self, yes_price: Decimal, no_price: Decimal) -> Option<StakePlan> {
        if yes_price < Decimal::ZERO || no_price < Decimal::ZERO {
            return None;
        }
        let pair_cost = yes_price.checked_add(no_price)?;
        if pair_cost <= Decimal::ZERO {
            return None;
        }

        let stake = self.stake()?;
        if stake <= Decimal::ZERO {
            return None;
        }

        let contracts = stake.checked_div(pair_cost)?;

        Some(StakePlan {
            stake,
            contracts,
            yes_leg_cost: contracts.checked_mul(yes_price)?,
            no_leg_cost: contracts.checked_mul(no_price)?,
            guaranteed_payout: contracts,
            guaranteed_profit: contracts.checked_sub(stake)?,
        })
    }
}
