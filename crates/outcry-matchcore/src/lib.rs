//! # outcry-matchcore
//!
//! **The continuous double-auction core for outcry.**
//!
//! One [`Market`] per instrument: both sides of the book, the cash/position
//! ledger, and the last trade price, driven by plain synchronous calls. It
//! has:
//!
//! - **Price-time priority**: best price leads, FIFO within a price
//! - **Strict crossing**: touching prices rest, trades need improvement
//! - **Maker pricing**: every fill executes at the resting order's price
//! - **A zero-sum ledger**: the only mutation is a two-party transfer, so
//!   cash and lots across a market always sum to exactly zero
//!
//! No internal locking and no I/O. A market is single-writer by
//! construction; the caller decides where the mutable reference lives.

pub mod ledger;
pub mod market;
pub mod price_level;
pub mod queue;

pub use ledger::Ledger;
pub use market::Market;
pub use price_level::PriceLevel;
pub use queue::SideQueue;
