//! Trade records produced by the matching operations.
//!
//! A [`Trade`] is the immutable record of one fill between a resting order
//! (maker) and the incoming operation that crossed it (taker). The trade
//! always executes at the resting order's price.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OwnerId, Side};

/// One fill between a buyer and a seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution price (the resting order's price).
    pub price: Decimal,
    /// Executed quantity in lots.
    pub quantity: u64,
    /// The owner whose cash decreased and net position increased.
    pub buyer: OwnerId,
    /// The owner whose cash increased and net position decreased.
    pub seller: OwnerId,
    /// The side of the incoming (aggressive) operation.
    pub taker_side: Side,
    /// When this fill executed.
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Cash that changed hands: `price × quantity`.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Whether buyer and seller are the same owner. Such fills net to zero
    /// exposure but still consume resting quantity and move the last trade
    /// price.
    #[must_use]
    pub fn is_self_trade(&self) -> bool {
        self.buyer == self.seller
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {} ({} bought from {})",
            self.quantity, self.price, self.buyer, self.seller
        )
    }
}
