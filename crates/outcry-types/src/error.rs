//! Error types for the outcry matching core.
//!
//! All errors use the `OC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order validation errors
//! - 2xx: Registry / market lifecycle errors
//! - 3xx: Ledger / settlement errors
//!
//! Running out of resting liquidity is deliberately **not** an error: `hit`
//! and `lift` against an under-stocked book complete as partial fills.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::MarketId;

/// Central error enum for all outcry operations.
#[derive(Debug, Error)]
pub enum OutcryError {
    // =================================================================
    // Order Validation Errors (1xx)
    // =================================================================
    /// A matching operation was given a zero quantity. Rejected before any
    /// state mutation.
    #[error("OC_ERR_100: Invalid quantity: {quantity} (must be a positive lot count)")]
    InvalidQuantity { quantity: u64 },

    /// A limit order carried a non-positive price. Rejected before any
    /// state mutation.
    #[error("OC_ERR_101: Invalid price: {price} (must be positive)")]
    InvalidPrice { price: Decimal },

    // =================================================================
    // Registry / Market Lifecycle Errors (2xx)
    // =================================================================
    /// No open market under this session key (never opened, or already
    /// closed by settlement).
    #[error("OC_ERR_200: No open market under {0}")]
    MarketNotFound(MarketId),

    /// A market is already running under this session key.
    #[error("OC_ERR_201: Market already open under {id}: {description}")]
    MarketAlreadyOpen {
        id: MarketId,
        /// Description of the market already running there.
        description: String,
    },

    // =================================================================
    // Ledger / Settlement Errors (3xx)
    // =================================================================
    /// The ledger's cash or net position totals drifted from zero. Every
    /// fill is a zero-sum transfer between exactly two positions, so a
    /// nonzero total means corrupted accounting and settlement refuses to
    /// pay out.
    #[error("OC_ERR_300: Ledger imbalance: total cash {cash}, total net position {net_position}")]
    LedgerImbalance { cash: Decimal, net_position: i64 },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OutcryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = OutcryError::InvalidQuantity { quantity: 0 };
        let msg = format!("{err}");
        assert!(msg.starts_with("OC_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn invalid_price_display() {
        let err = OutcryError::InvalidPrice {
            price: Decimal::new(-5, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OC_ERR_101"));
        assert!(msg.contains("-5"));
    }

    #[test]
    fn market_not_found_display() {
        let err = OutcryError::MarketNotFound(MarketId::from("C042"));
        let msg = format!("{err}");
        assert!(msg.contains("OC_ERR_200"));
        assert!(msg.contains("C042"));
    }

    #[test]
    fn market_already_open_display() {
        let err = OutcryError::MarketAlreadyOpen {
            id: MarketId::from("C042"),
            description: "gold at year end".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("OC_ERR_201"));
        assert!(msg.contains("market:C042"));
        assert!(msg.contains("gold at year end"));
    }

    #[test]
    fn all_errors_have_oc_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(OutcryError::InvalidQuantity { quantity: 0 }),
            Box::new(OutcryError::InvalidPrice {
                price: Decimal::ZERO,
            }),
            Box::new(OutcryError::MarketNotFound(MarketId::from("C1"))),
            Box::new(OutcryError::MarketAlreadyOpen {
                id: MarketId::from("C1"),
                description: "gold at year end".into(),
            }),
            Box::new(OutcryError::LedgerImbalance {
                cash: Decimal::ONE,
                net_position: 0,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("OC_ERR_"),
                "Error missing OC_ERR_ prefix: {msg}"
            );
        }
    }
}
