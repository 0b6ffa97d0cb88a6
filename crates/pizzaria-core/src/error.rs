//! # Error Types
//!
//! Domain-specific error types for pizzaria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  pizzaria-core errors (this file)                                   │
//! │  ├── CoreError        - Pricing / lifecycle failures                │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  pizzaria-db errors (separate crate)                                │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → CLI message          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, quantities)
//! 3. Errors are enum variants, never String
//! 4. Fail fast, no partial mutation: either the whole computation
//!    succeeds or the caller's state is unchanged

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing-engine and lifecycle errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item references a product, crust, extra, customer or order
    /// id that does not exist in the catalog snapshot it was priced
    /// against.
    #[error("{kind} not found: {id}")]
    ReferenceNotFound { kind: &'static str, id: String },

    /// Quantity is zero or negative.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: i64 },

    /// A pizza line item has no resolvable size/price tier.
    ///
    /// ## When This Occurs
    /// - A product categorized as pizza carries a flat price instead of
    ///   the P/M/G schedule (corrupt catalog data)
    #[error("Pizza {product_id} has no resolvable price tier")]
    IncompletePricingData { product_id: String },

    /// A lifecycle transition was attempted on a closed order.
    #[error("Order is {status} and accepts no further transitions")]
    TerminalState { status: OrderStatus },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for
/// early validation before the pricing engine or repositories run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. invalid UUID, malformed decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set. Also covers out-of-enum payment,
    /// fulfillment and status strings at the boundary: they are rejected,
    /// never coerced.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ReferenceNotFound {
            kind: "Product",
            id: "p-42".to_string(),
        };
        assert_eq!(err.to_string(), "Product not found: p-42");

        let err = CoreError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "Invalid quantity: 0 (must be at least 1)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
