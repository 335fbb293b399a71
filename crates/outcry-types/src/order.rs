//! Order model for the outcry matching core.
//!
//! An [`Order`] is a resting limit order. Book priority is decided by price
//! first and then by `sequence` (per-side arrival counter); `placed_at` is
//! display metadata only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OwnerId;

/// Which side of the book an order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Side {
    /// Buy side: owners willing to pay the stated price.
    Bid,
    /// Sell side: owners asking the stated price.
    Ask,
}

impl Side {
    /// The side an order on this side trades against.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
        }
    }
}

/// A resting limit order.
///
/// Invariant: an order held by a book always has `quantity > 0`; a fill
/// that exhausts it removes it rather than leaving it at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub side: Side,
    pub price: Decimal,
    pub quantity: u64,
    pub owner: OwnerId,
    /// Per-side arrival counter; lower = earlier = higher time priority.
    pub sequence: u64,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn new(side: Side, price: Decimal, quantity: u64, owner: OwnerId, sequence: u64) -> Self {
        Self {
            side,
            price,
            quantity,
            owner,
            sequence,
            placed_at: Utc::now(),
        }
    }

    /// Cash value of the full resting quantity at the order's own price.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} @ {} ({})",
            self.side, self.quantity, self.price, self.owner
        )
    }
}

/// A read-only snapshot of resting orders, for presentation.
///
/// Bids are sorted by descending price and asks by ascending price, so the
/// best price comes first on both sides. Equal-price ordering within the
/// snapshot is a display detail; matching priority lives in the books
/// themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}

impl BookSnapshot {
    /// Whether neither side has any resting orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Total resting orders across both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }
}
