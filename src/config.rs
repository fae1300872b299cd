use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// servicing parameters shared by the interest engine and the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicingConfig {
    /// simple penalty interest per elapsed day overdue, applied to the
    /// face value; no cap on total accrual
    pub daily_penalty_rate: Rate,
    /// fraction of the expected amount below which a received payment is
    /// rejected for manual review
    pub acceptance_threshold: Rate,
}

impl ServicingConfig {
    /// observed production values: 1% of face value per day, payments
    /// accepted down to 95% of the expected amount
    pub fn new() -> Self {
        Self {
            daily_penalty_rate: Rate::from_decimal(dec!(0.01)),
            acceptance_threshold: Rate::from_decimal(dec!(0.95)),
        }
    }

    /// no tolerance band: only the full expected amount settles
    pub fn strict() -> Self {
        Self {
            acceptance_threshold: Rate::ONE,
            ..Self::new()
        }
    }
}

impl Default for ServicingConfig {
    fn default() -> Self {
        Self::new()
    }
}
