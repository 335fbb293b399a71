//! The per-market cash/position ledger.
//!
//! Tracks one [`Position`] per owner. Positions are created flat on first
//! reference (by a fill or by an explicit query) and are never deleted
//! while the market lives. The only mutation is [`Ledger::transfer`], a
//! strict zero-sum move between exactly two positions, so the ledger's
//! cash and net-position totals are always exactly zero.

use std::collections::{BTreeMap, HashMap};

use outcry_types::{OwnerId, Position};
use rust_decimal::Decimal;

/// Owner → position mapping with get-or-create semantics.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    positions: HashMap<OwnerId, Position>,
}

impl Ledger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Book one fill: the buyer pays `price × quantity` and gains
    /// `quantity` lots, the seller receives the cash and sheds the lots.
    /// Both positions are created flat if absent.
    #[allow(clippy::cast_possible_wrap)] // lot counts stay far below i64::MAX
    pub fn transfer(&mut self, price: Decimal, quantity: u64, buyer: &OwnerId, seller: &OwnerId) {
        let notional = price * Decimal::from(quantity);
        let lots = quantity as i64;

        let buy = self.positions.entry(buyer.clone()).or_default();
        buy.cash -= notional;
        buy.net_position += lots;

        let sell = self.positions.entry(seller.clone()).or_default();
        sell.cash += notional;
        sell.net_position -= lots;
    }

    /// The position for `owner`, created flat if this is the first
    /// reference to them.
    pub fn position(&mut self, owner: &OwnerId) -> Position {
        *self.positions.entry(owner.clone()).or_default()
    }

    /// Read a position without creating it.
    #[must_use]
    pub fn get(&self, owner: &OwnerId) -> Option<&Position> {
        self.positions.get(owner)
    }

    /// Whether `owner` has ever been referenced.
    #[must_use]
    pub fn contains(&self, owner: &OwnerId) -> bool {
        self.positions.contains_key(owner)
    }

    /// Iterate all recorded positions (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = (&OwnerId, &Position)> {
        self.positions.iter()
    }

    /// Number of owners ever referenced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no owner has been referenced yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of cash across all positions. Always exactly zero for a ledger
    /// mutated only through [`Ledger::transfer`].
    #[must_use]
    pub fn total_cash(&self) -> Decimal {
        self.positions.values().map(|p| p.cash).sum()
    }

    /// Sum of net positions across all owners. Always exactly zero, same
    /// as [`Ledger::total_cash`].
    #[must_use]
    pub fn total_net_position(&self) -> i64 {
        self.positions.values().map(|p| p.net_position).sum()
    }

    /// Cash-settle every recorded position at `price`:
    /// `final_value = cash + net_position × price`, for every owner ever
    /// referenced, including flat ones. Sorted by owner for deterministic
    /// presentation.
    #[must_use]
    pub fn settle(&self, price: Decimal) -> BTreeMap<OwnerId, Decimal> {
        self.positions
            .iter()
            .map(|(owner, position)| (owner.clone(), position.final_value(price)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn owner(name: &str) -> OwnerId {
        OwnerId::from(name)
    }

    #[test]
    fn transfer_moves_cash_and_lots_zero_sum() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(8), 3, &owner("alice"), &owner("bob"));

        let alice = *ledger.get(&owner("alice")).unwrap();
        let bob = *ledger.get(&owner("bob")).unwrap();
        assert_eq!(alice.cash, dec(-24));
        assert_eq!(alice.net_position, 3);
        assert_eq!(bob.cash, dec(24));
        assert_eq!(bob.net_position, -3);

        assert_eq!(alice.cash + bob.cash, Decimal::ZERO);
        assert_eq!(alice.net_position + bob.net_position, 0);
    }

    #[test]
    fn transfer_accumulates() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(10), 2, &owner("alice"), &owner("bob"));
        ledger.transfer(dec(12), 1, &owner("alice"), &owner("bob"));

        let alice = *ledger.get(&owner("alice")).unwrap();
        assert_eq!(alice.cash, dec(-32));
        assert_eq!(alice.net_position, 3);
    }

    #[test]
    fn self_transfer_nets_flat() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(10), 4, &owner("alice"), &owner("alice"));
        assert!(ledger.get(&owner("alice")).unwrap().is_flat());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn position_query_creates_flat_entry() {
        let mut ledger = Ledger::new();
        assert!(!ledger.contains(&owner("dave")));

        let position = ledger.position(&owner("dave"));
        assert!(position.is_flat());
        assert!(ledger.contains(&owner("dave")), "query-only owners persist");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn position_query_preserves_existing_balance() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(8), 3, &owner("alice"), &owner("bob"));

        let alice = ledger.position(&owner("alice"));
        assert_eq!(alice.cash, dec(-24));
        assert_eq!(alice.net_position, 3);
        assert_eq!(ledger.len(), 2, "query of a known owner adds no entry");
    }

    #[test]
    fn get_does_not_create() {
        let ledger = Ledger::new();
        assert!(ledger.get(&owner("dave")).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn totals_stay_zero_across_many_transfers() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(10), 5, &owner("a"), &owner("b"));
        ledger.transfer(dec(7), 2, &owner("b"), &owner("c"));
        ledger.transfer(dec(3), 9, &owner("c"), &owner("a"));

        assert_eq!(ledger.total_cash(), Decimal::ZERO);
        assert_eq!(ledger.total_net_position(), 0);
    }

    #[test]
    fn settle_covers_every_owner_including_flat() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(8), 3, &owner("alice"), &owner("bob"));
        ledger.position(&owner("dave"));

        let payouts = ledger.settle(dec(9));
        assert_eq!(payouts.len(), 3);
        assert_eq!(payouts[&owner("alice")], dec(3)); // -24 + 3×9
        assert_eq!(payouts[&owner("bob")], dec(-3)); // 24 - 3×9
        assert_eq!(payouts[&owner("dave")], Decimal::ZERO);
    }

    #[test]
    fn settle_of_empty_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.settle(dec(100)).is_empty());
    }

    #[test]
    fn settle_payouts_sum_to_zero() {
        let mut ledger = Ledger::new();
        ledger.transfer(dec(10), 5, &owner("a"), &owner("b"));
        ledger.transfer(dec(12), 2, &owner("c"), &owner("a"));

        let payouts = ledger.settle(dec(11));
        let total: Decimal = payouts.values().copied().sum();
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn exact_decimal_cash_no_drift() {
        // 0.1-style prices must not accumulate binary floating point error.
        let mut ledger = Ledger::new();
        let price = Decimal::new(1, 1); // 0.1
        for _ in 0..1000 {
            ledger.transfer(price, 1, &owner("a"), &owner("b"));
        }
        assert_eq!(ledger.get(&owner("b")).unwrap().cash, dec(100));
        assert_eq!(ledger.total_cash(), Decimal::ZERO);
    }
}
