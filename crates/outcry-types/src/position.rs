//! Per-owner cash/position balance.
//!
//! Every owner referenced by a market (as a trade counterparty or via an
//! explicit query) gets a [`Position`], created flat and never deleted
//! for the life of the market.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running cash and net position for one owner in one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Cash paid out (negative) or taken in (positive) across all fills.
    pub cash: Decimal,
    /// Signed lots bought (positive) minus sold (negative).
    pub net_position: i64,
}

impl Position {
    /// A flat position: no cash, no exposure.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cash: Decimal::ZERO,
            net_position: 0,
        }
    }

    /// Cash value of this position if the instrument settles at `price`:
    /// `cash + net_position × price`.
    #[must_use]
    pub fn final_value(&self, price: Decimal) -> Decimal {
        self.cash + Decimal::from(self.net_position) * price
    }

    /// Whether this position carries no cash and no exposure.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.cash.is_zero() && self.net_position == 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cash {}, net {:+}", self.cash, self.net_position)
    }
}
