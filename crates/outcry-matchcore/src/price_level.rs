//! A single price level in a book side.
//!
//! Orders at the same price are stored in FIFO order (time priority)
//! using a [`VecDeque`].

use std::collections::VecDeque;

use outcry_types::{Order, OwnerId};
use rust_decimal::Decimal;

/// All orders resting at one price, in arrival order.
///
/// The front of the deque arrived earliest and fills first.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// The price at this level.
    pub price: Decimal,
    orders: VecDeque<Order>,
}

impl PriceLevel {
    /// Create a new empty price level.
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
        }
    }

    /// Add an order to the back of this level (lowest time priority).
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Remove and return the front (oldest) order.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Peek at the front order without removing it.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the front order, for in-place partial fills.
    pub(crate) fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Iterate orders in time-priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Total remaining quantity across all orders at this level.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(|o| o.quantity).sum()
    }

    /// Remove every order belonging to `owner`, preserving the relative
    /// order of the rest. Returns the removed orders.
    pub fn remove_owner(&mut self, owner: &OwnerId) -> Vec<Order> {
        let mut removed = Vec::new();
        let mut kept = VecDeque::with_capacity(self.orders.len());
        for order in self.orders.drain(..) {
            if order.owner == *owner {
                removed.push(order);
            } else {
                kept.push_back(order);
            }
        }
        self.orders = kept;
        removed
    }

    /// Returns `true` if there are no orders at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }
}
