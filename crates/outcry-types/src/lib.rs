//! # outcry-types
//!
//! Shared types and errors for the **outcry** matching core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OwnerId`], [`MarketId`]
//! - **Order model**: [`Order`], [`Side`]
//! - **Position model**: [`Position`]
//! - **Trade model**: [`Trade`]
//! - **Errors**: [`OutcryError`] with `OC_ERR_` prefix codes
//!
//! Prices and cash are [`rust_decimal::Decimal`] throughout so that the
//! zero-sum accounting invariants hold exactly, not approximately.

pub mod error;
pub mod ids;
pub mod order;
pub mod position;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use outcry_types::{Order, Side, Position, Trade, ...};

pub use error::*;
pub use ids::*;
pub use order::*;
pub use position::*;
pub use trade::*;
