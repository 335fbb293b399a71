//! # outcry-registry
//!
//! **Market lifecycle for outcry.**
//!
//! The registry owns the map from session keys to live markets and drives
//! the lifecycle the matching core deliberately stays out of:
//!
//! ```text
//! open -> trade -> settle -> closed (key free again)
//! ```
//!
//! Settlement is the one cross-cutting step: it audits the ledger's
//! conservation invariant, values every position at the settlement price,
//! and closes the market in a single call.

pub mod conservation;
pub mod registry;

pub use registry::MarketRegistry;
