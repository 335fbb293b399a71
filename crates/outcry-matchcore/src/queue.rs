//! One side of the book: a priority-ordered queue of resting orders.
//!
//! Orders live in per-price FIFO levels inside a `BTreeMap`, so the best
//! price is always the first key (asks) or last key (bids), and arrival
//! order within a price is the level's deque order. The queue stamps each
//! inserted order with its own monotonically increasing arrival sequence.

use std::collections::BTreeMap;

use outcry_types::{Order, OwnerId, Side};
use rust_decimal::Decimal;

use crate::price_level::PriceLevel;

/// A priority-ordered queue of resting orders for one side.
///
/// Priority: best price first (highest for bids, lowest for asks), ties
/// broken by ascending arrival sequence. The lead order is the one every
/// matching operation consumes next.
#[derive(Debug, Clone)]
pub struct SideQueue {
    side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
    next_sequence: u64,
}

impl SideQueue {
    /// Create an empty queue for the given side.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// Which side this queue holds.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert a new resting order at `price`, behind any orders already
    /// resting at that price. Always succeeds; callers validate first.
    pub fn insert(&mut self, price: Decimal, quantity: u64, owner: OwnerId) {
        let order = Order::new(self.side, price, quantity, owner, self.next_sequence);
        self.next_sequence += 1;
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(order);
    }

    /// The best price on this side, or `None` if the queue is empty.
    #[must_use]
    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            Side::Bid => self.levels.keys().next_back().copied(),
            Side::Ask => self.levels.keys().next().copied(),
        }
    }

    /// The highest-priority order, without removing it.
    #[must_use]
    pub fn peek_lead(&self) -> Option<&Order> {
        let level = match self.side {
            Side::Bid => self.levels.values().next_back(),
            Side::Ask => self.levels.values().next(),
        }?;
        level.front()
    }

    /// Remove and return the highest-priority order.
    pub fn pop_lead(&mut self) -> Option<Order> {
        let mut entry = match self.side {
            Side::Bid => self.levels.last_entry(),
            Side::Ask => self.levels.first_entry(),
        }?;
        let order = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        order
    }

    /// Fill `quantity` lots out of the lead order, removing it (and its
    /// level, if emptied) once exhausted. `quantity` must not exceed the
    /// lead's remaining quantity; an order never rests at zero.
    pub(crate) fn fill_lead(&mut self, quantity: u64) {
        let Some(mut entry) = (match self.side {
            Side::Bid => self.levels.last_entry(),
            Side::Ask => self.levels.first_entry(),
        }) else {
            return;
        };
        let exhausted = {
            let Some(lead) = entry.get_mut().front_mut() else {
                return;
            };
            debug_assert!(quantity <= lead.quantity, "fill exceeds lead quantity");
            lead.quantity -= quantity;
            lead.quantity == 0
        };
        if exhausted {
            entry.get_mut().pop_front();
        }
        if entry.get().is_empty() {
            entry.remove();
        }
    }

    /// Remove every order belonging to `owner` from all levels, preserving
    /// the relative order of the rest. Returns the removed orders. No
    /// error if the owner has nothing resting.
    pub fn remove_owner(&mut self, owner: &OwnerId) -> Vec<Order> {
        let mut removed = Vec::new();
        self.levels.retain(|_, level| {
            removed.extend(level.remove_owner(owner));
            !level.is_empty()
        });
        removed
    }

    /// Discard every resting order. The arrival counter keeps running so
    /// sequences stay unique for the life of the market.
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Iterate all resting orders in priority order (lead first).
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Order> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.values().rev().flat_map(PriceLevel::iter)),
            Side::Ask => Box::new(self.levels.values().flat_map(PriceLevel::iter)),
        }
    }

    /// Number of distinct price levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Total number of resting orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.values().map(PriceLevel::len).sum()
    }

    /// Total resting quantity across all orders.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.levels.values().map(PriceLevel::total_quantity).sum()
    }

    /// Returns `true` if no orders rest on this side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
