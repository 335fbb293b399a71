//! Ledger conservation invariant checker.
//!
//! Invariant audited before every settlement payout:
//! ```text
//! Σ cash == 0    and    Σ net_position == 0
//! ```
//!
//! Every position starts flat and the only ledger mutation is the two-party
//! transfer booked per fill, so both totals hold exactly at all times. This
//! is the ultimate safety net: if either total is nonzero, accounting has
//! gone catastrophically wrong and settlement must not pay out.

use outcry_matchcore::Ledger;
use outcry_types::{OutcryError, Result};
use rust_decimal::Decimal;

/// Verify a pair of ledger totals.
///
/// # Errors
/// Returns [`OutcryError::LedgerImbalance`] if either total is nonzero.
pub fn verify_totals(cash: Decimal, net_position: i64) -> Result<()> {
    if !cash.is_zero() || net_position != 0 {
        return Err(OutcryError::LedgerImbalance { cash, net_position });
    }
    Ok(())
}

/// Verify that a ledger's cash and net-position totals are both zero.
///
/// # Errors
/// Returns [`OutcryError::LedgerImbalance`] if either total is nonzero.
pub fn verify(ledger: &Ledger) -> Result<()> {
    verify_totals(ledger.total_cash(), ledger.total_net_position())
}
