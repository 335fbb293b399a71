//! A single-instrument continuous double-auction market.
//!
//! One `Market` owns both sides of the book, the cash/position ledger for
//! its participants, and the last trade price. Every operation is a plain
//! synchronous call that runs to completion before returning:
//!
//! ```text
//! bid/ask(price, qty) -> Vec<Trade>    limit order: cross, then rest
//! hit/lift(qty)       -> Vec<Trade>    take the opposite book as it stands
//! ```
//!
//! ## Matching rules
//!
//! Limit orders cross on **strict** price inequality only: an incoming bid
//! trades against asks priced strictly below it, an incoming ask against
//! bids priced strictly above it. Orders at touching prices rest next to
//! each other. Every fill executes at the **resting** order's price, so the
//! aggressor concedes the price difference. Resting orders fill in
//! price-time priority and are removed the moment their quantity reaches
//! zero; the unfilled remainder of the incoming order rests at its limit.
//!
//! `hit` and `lift` take liquidity unconditionally: they walk the lead of
//! the opposite book, trading at each resting order's own price, until the
//! requested quantity is exhausted or the book runs dry. Running dry is a
//! partial fill, not an error.
//!
//! There is no self-trade prevention. An owner crossing their own resting
//! order trades normally: the ledger entries net to zero, the resting
//! quantity is consumed, and the last trade price moves.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use outcry_types::{BookSnapshot, Order, OutcryError, OwnerId, Position, Result, Side, Trade};
use rust_decimal::Decimal;

use crate::{Ledger, SideQueue};

/// A single-instrument market: both book sides, the ledger, and the tape.
#[derive(Debug, Clone)]
pub struct Market {
    description: String,
    bids: SideQueue,
    asks: SideQueue,
    ledger: Ledger,
    last_trade_price: Option<Decimal>,
}

impl Market {
    /// Open a market for one instrument, described in free text (e.g. the
    /// question or contract the instrument tracks).
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            bids: SideQueue::new(Side::Bid),
            asks: SideQueue::new(Side::Ask),
            ledger: Ledger::new(),
            last_trade_price: None,
        }
    }

    /// The instrument description this market was opened with.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    // =====================================================================
    // Matching operations
    // =====================================================================

    /// Place a limit buy. Crosses against asks priced strictly below
    /// `price` in price-time priority, trading at each resting ask's price,
    /// then rests any remainder at `price`. Returns the fills executed.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` if `quantity` is zero, `InvalidPrice` if `price`
    /// is not positive. Nothing is mutated on error.
    pub fn bid(&mut self, price: Decimal, quantity: u64, owner: &OwnerId) -> Result<Vec<Trade>> {
        validate_limit(price, quantity)?;

        let mut remaining = quantity;
        let mut fills = Vec::new();
        while remaining > 0 {
            let Some(lead) = self.asks.peek_lead() else {
                break;
            };
            // Equal prices do not cross; the remainder rests at its limit.
            if lead.price >= price {
                break;
            }
            let (maker_price, maker_qty, maker) = (lead.price, lead.quantity, lead.owner.clone());

            let fill_qty = remaining.min(maker_qty);
            let trade = self.transact(maker_price, fill_qty, owner.clone(), maker, Side::Bid);
            fills.push(trade);
            self.asks.fill_lead(fill_qty);
            remaining -= fill_qty;
        }

        if remaining > 0 {
            tracing::debug!(
                side = %Side::Bid,
                price = %price,
                quantity = remaining,
                owner = %owner,
                "Order rested"
            );
            self.bids.insert(price, remaining, owner.clone());
        }
        Ok(fills)
    }

    /// Place a limit sell. Crosses against bids priced strictly above
    /// `price`, trading at each resting bid's price, then rests any
    /// remainder at `price`. Returns the fills executed.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` if `quantity` is zero, `InvalidPrice` if `price`
    /// is not positive. Nothing is mutated on error.
    pub fn ask(&mut self, price: Decimal, quantity: u64, owner: &OwnerId) -> Result<Vec<Trade>> {
        validate_limit(price, quantity)?;

        let mut remaining = quantity;
        let mut fills = Vec::new();
        while remaining > 0 {
            let Some(lead) = self.bids.peek_lead() else {
                break;
            };
            if lead.price <= price {
                break;
            }
            let (maker_price, maker_qty, maker) = (lead.price, lead.quantity, lead.owner.clone());

            let fill_qty = remaining.min(maker_qty);
            let trade = self.transact(maker_price, fill_qty, maker, owner.clone(), Side::Ask);
            fills.push(trade);
            self.bids.fill_lead(fill_qty);
            remaining -= fill_qty;
        }

        if remaining > 0 {
            tracing::debug!(
                side = %Side::Ask,
                price = %price,
                quantity = remaining,
                owner = %owner,
                "Order rested"
            );
            self.asks.insert(price, remaining, owner.clone());
        }
        Ok(fills)
    }

    /// Sell `quantity` into the bid book unconditionally, trading at each
    /// resting bid's own price from the top down. Stops when the quantity
    /// is exhausted or the book is empty; nothing rests. An early-empty
    /// book is a partial fill, not an error.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` if `quantity` is zero.
    pub fn hit(&mut self, quantity: u64, owner: &OwnerId) -> Result<Vec<Trade>> {
        validate_quantity(quantity)?;

        let mut remaining = quantity;
        let mut fills = Vec::new();
        while remaining > 0 {
            let Some(lead) = self.bids.peek_lead() else {
                break;
            };
            let (maker_price, maker_qty, maker) = (lead.price, lead.quantity, lead.owner.clone());

            let fill_qty = remaining.min(maker_qty);
            let trade = self.transact(maker_price, fill_qty, maker, owner.clone(), Side::Ask);
            fills.push(trade);
            self.bids.fill_lead(fill_qty);
            remaining -= fill_qty;
        }
        Ok(fills)
    }

    /// Buy `quantity` from the ask book unconditionally, trading at each
    /// resting ask's own price from the bottom up. The mirror of
    /// [`Market::hit`].
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` if `quantity` is zero.
    pub fn lift(&mut self, quantity: u64, owner: &OwnerId) -> Result<Vec<Trade>> {
        validate_quantity(quantity)?;

        let mut remaining = quantity;
        let mut fills = Vec::new();
        while remaining > 0 {
            let Some(lead) = self.asks.peek_lead() else {
                break;
            };
            let (maker_price, maker_qty, maker) = (lead.price, lead.quantity, lead.owner.clone());

            let fill_qty = remaining.min(maker_qty);
            let trade = self.transact(maker_price, fill_qty, owner.clone(), maker, Side::Bid);
            fills.push(trade);
            self.asks.fill_lead(fill_qty);
            remaining -= fill_qty;
        }
        Ok(fills)
    }

    /// The sole trade bookkeeper: moves cash and lots through the ledger,
    /// advances the last trade price, and emits the fill record.
    fn transact(
        &mut self,
        price: Decimal,
        quantity: u64,
        buyer: OwnerId,
        seller: OwnerId,
        taker_side: Side,
    ) -> Trade {
        self.ledger.transfer(price, quantity, &buyer, &seller);
        self.last_trade_price = Some(price);

        tracing::debug!(
            price = %price,
            quantity,
            buyer = %buyer,
            seller = %seller,
            taker = %taker_side,
            "Fill executed"
        );

        Trade {
            price,
            quantity,
            buyer,
            seller,
            taker_side,
            executed_at: Utc::now(),
        }
    }

    // =====================================================================
    // Introspection
    // =====================================================================

    /// Snapshot of the whole book: bids best-first (descending price), asks
    /// best-first (ascending price), FIFO within a price.
    #[must_use]
    pub fn book(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.bids.iter().cloned().collect(),
            asks: self.asks.iter().cloned().collect(),
        }
    }

    /// Snapshot of one owner's resting orders, in the same order they
    /// appear in [`Market::book`].
    #[must_use]
    pub fn book_for(&self, owner: &OwnerId) -> BookSnapshot {
        BookSnapshot {
            bids: self
                .bids
                .iter()
                .filter(|order| &order.owner == owner)
                .cloned()
                .collect(),
            asks: self
                .asks
                .iter()
                .filter(|order| &order.owner == owner)
                .cloned()
                .collect(),
        }
    }

    /// One owner's position, created flat on first query so they are part
    /// of any later settlement.
    pub fn position(&mut self, owner: &OwnerId) -> Position {
        self.ledger.position(owner)
    }

    /// Iterate every recorded position (arbitrary order).
    pub fn positions(&self) -> impl Iterator<Item = (&OwnerId, &Position)> {
        self.ledger.iter()
    }

    /// Read access to the ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Best (highest) resting bid price.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    /// Best (lowest) resting ask price.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// Ask minus bid at the top of the book, when both sides are populated.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint of the top of the book, when both sides are populated.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Price of the most recent fill, if any trade has happened.
    #[must_use]
    pub fn last_trade(&self) -> Option<Decimal> {
        self.last_trade_price
    }

    /// The bid side of the book.
    #[must_use]
    pub fn bids(&self) -> &SideQueue {
        &self.bids
    }

    /// The ask side of the book.
    #[must_use]
    pub fn asks(&self) -> &SideQueue {
        &self.asks
    }

    /// Total resting orders across both sides.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    // =====================================================================
    // Cancellation and settlement
    // =====================================================================

    /// Remove all of `owner`'s resting orders from both sides, returning
    /// them. Other owners' orders keep their relative ordering. Positions
    /// are untouched.
    pub fn cancel(&mut self, owner: &OwnerId) -> Vec<Order> {
        let mut removed = self.bids.remove_owner(owner);
        removed.extend(self.asks.remove_owner(owner));
        if !removed.is_empty() {
            tracing::debug!(owner = %owner, orders = removed.len(), "Orders cancelled");
        }
        removed
    }

    /// Empty both sides of the book. The ledger survives: positions built
    /// by past trades stay exactly as they are, only unfilled intentions
    /// are discarded.
    pub fn clear_book(&mut self) {
        self.bids.clear();
        self.asks.clear();
        tracing::debug!("Book cleared");
    }

    /// Value every recorded position at `settlement_price`:
    /// `cash + net_position × price` per owner, flat owners included.
    /// Pure: the market itself is not mutated or closed.
    #[must_use]
    pub fn settle(&self, settlement_price: Decimal) -> BTreeMap<OwnerId, Decimal> {
        self.ledger.settle(settlement_price)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Market: {}", self.description)?;
        writeln!(f, "Bids: {}", render_side(&self.bids))?;
        writeln!(f, "Asks: {}", render_side(&self.asks))?;
        match self.last_trade_price {
            Some(price) => writeln!(f, "Last trade: {price}")?,
            None => writeln!(f, "Last trade: (none)")?,
        }
        write!(f, "Positions:")?;
        if self.ledger.is_empty() {
            write!(f, " (none)")?;
        } else {
            let mut entries: Vec<_> = self.ledger.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (owner, position) in entries {
                write!(f, "\n  {owner}: {position}")?;
            }
        }
        Ok(())
    }
}

/// Lead-first one-line rendering of a book side.
fn render_side(queue: &SideQueue) -> String {
    if queue.is_empty() {
        return "(none)".to_owned();
    }
    queue
        .iter()
        .map(|order| format!("{} @ {} ({})", order.quantity, order.price, order.owner))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn validate_quantity(quantity: u64) -> Result<()> {
    if quantity == 0 {
        return Err(OutcryError::InvalidQuantity { quantity });
    }
    Ok(())
}

fn validate_limit(price: Decimal, quantity: u64) -> Result<()> {
    validate_quantity(quantity)?;
    if price <= Decimal::ZERO {
        return Err(OutcryError::InvalidPrice { price });
    }
    Ok(())
}
