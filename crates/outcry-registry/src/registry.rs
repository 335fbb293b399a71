//! Session-keyed market lifecycle.
//!
//! The registry files one independent [`Market`] under each [`MarketId`]
//! (a chat channel, a session, any opaque key the host hands in). A key
//! holds at most one live market: opening over a live market is an error,
//! and settlement closes the market and frees the key for the next one.
//!
//! ```text
//! open(id, description) -> &mut Market
//! market_mut(id)        -> &mut Market      (trade, cancel, inspect)
//! settle(id, price)     -> payouts          (audit, pay out, close)
//! ```
//!
//! Markets never share state; the registry does no cross-market
//! coordination beyond key management.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use outcry_matchcore::Market;
use outcry_types::{MarketId, OutcryError, OwnerId, Result};
use rust_decimal::Decimal;

use crate::conservation;

/// All live markets, one per session key.
#[derive(Debug, Default)]
pub struct MarketRegistry {
    markets: HashMap<MarketId, Market>,
}

impl MarketRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            markets: HashMap::new(),
        }
    }

    /// Open a market under `id` with a free-text instrument description,
    /// returning a handle for placing the first orders.
    ///
    /// # Errors
    ///
    /// [`OutcryError::MarketAlreadyOpen`] if a market is already live
    /// under this key; the running market is left untouched.
    pub fn open(&mut self, id: MarketId, description: impl Into<String>) -> Result<&mut Market> {
        match self.markets.entry(id) {
            Entry::Occupied(entry) => Err(OutcryError::MarketAlreadyOpen {
                id: entry.key().clone(),
                description: entry.get().description().to_owned(),
            }),
            Entry::Vacant(entry) => {
                let description = description.into();
                tracing::info!(market = %entry.key(), description = %description, "Market opened");
                Ok(entry.insert(Market::new(description)))
            }
        }
    }

    /// The live market under `id`.
    ///
    /// # Errors
    ///
    /// [`OutcryError::MarketNotFound`] if the key has no live market.
    pub fn market(&self, id: &MarketId) -> Result<&Market> {
        self.markets
            .get(id)
            .ok_or_else(|| OutcryError::MarketNotFound(id.clone()))
    }

    /// Mutable handle to the live market under `id`.
    ///
    /// # Errors
    ///
    /// [`OutcryError::MarketNotFound`] if the key has no live market.
    pub fn market_mut(&mut self, id: &MarketId) -> Result<&mut Market> {
        self.markets
            .get_mut(id)
            .ok_or_else(|| OutcryError::MarketNotFound(id.clone()))
    }

    /// Settle the market under `id` at `settlement_price` and close it.
    ///
    /// The ledger is audited for conservation first; a corrupted ledger
    /// refuses to pay out and the market stays open for inspection. On
    /// success every recorded owner's final value is returned and the key
    /// is freed.
    ///
    /// # Errors
    ///
    /// [`OutcryError::MarketNotFound`] if the key has no live market,
    /// [`OutcryError::LedgerImbalance`] if the conservation audit fails.
    pub fn settle(
        &mut self,
        id: &MarketId,
        settlement_price: Decimal,
    ) -> Result<BTreeMap<OwnerId, Decimal>> {
        let market = self
            .markets
            .get(id)
            .ok_or_else(|| OutcryError::MarketNotFound(id.clone()))?;
        conservation::verify(market.ledger())?;

        let payouts = market.settle(settlement_price);
        self.markets.remove(id);

        tracing::info!(
            market = %id,
            price = %settlement_price,
            owners = payouts.len(),
            "Market settled and closed"
        );
        Ok(payouts)
    }

    /// Whether a market is live under `id`.
    #[must_use]
    pub fn contains(&self, id: &MarketId) -> bool {
        self.markets.contains_key(id)
    }

    /// Number of live markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Returns `true` if no market is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Iterate live markets (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = (&MarketId, &Market)> {
        self.markets.iter()
    }
}
