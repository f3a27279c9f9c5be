//! # Error Types
//!
//! Domain-specific error types for minierp-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  minierp-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  minierp-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  API errors (in the server)                                         │
//! │  └── ApiError         - What HTTP clients see (serialized)          │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, id, quantities)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are caught at the
/// API boundary and translated to HTTP status codes there.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete an outbound movement.
    ///
    /// ## When This Occurs
    /// - Placing a sales order for more than the warehouse holds
    /// - `Stock::decrease` with qty greater than the current balance
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// A movement quantity was zero or negative where a positive amount
    /// is required.
    #[error("quantity must be at least 1, got {0}")]
    NonPositiveQuantity(i64),

    /// A stock adjustment with a zero delta (nothing to record).
    #[error("adjustment delta must not be zero")]
    ZeroAdjustment,

    /// A required reference id (purchase order / sales order) was missing
    /// when writing an inventory transaction.
    #[error("{0} reference id is required")]
    MissingReference(&'static str),

    /// The entity is not in a status that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding lines to an order that is no longer CREATED
    /// - Receiving a purchase order that was never placed
    /// - Cancelling an order that already shipped
    #[error("{entity} is {status}, cannot {operation}")]
    InvalidStatus {
        entity: &'static str,
        status: String,
        operation: &'static str,
    },

    /// An order already has a line for this (item, warehouse) pair.
    #[error("duplicate order line for item {item_id} in warehouse {warehouse_id}")]
    DuplicateLine { item_id: i64, warehouse_id: i64 },

    /// An order line with the given id does not exist on the order.
    #[error("order line not found: {0}")]
    LineNotFound(i64),

    /// An order needs at least one line before it can be placed.
    #[error("order requires at least one line")]
    EmptyOrder,

    /// A partner of the wrong type was used (supplier where a customer is
    /// required, or the other way around).
    #[error("partner {partner_id} is not a {expected}")]
    WrongPartnerType {
        partner_id: i64,
        expected: &'static str,
    },

    /// The item or warehouse is INACTIVE and cannot take part in orders.
    #[error("{entity} {id} is inactive")]
    Inactive { entity: &'static str, id: i64 },

    /// A code was requested for an entity that has no persisted id yet.
    #[error("cannot derive a code before an id is assigned")]
    CodeBeforeId,

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet field-level requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Invalid format (bad characters, malformed code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
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
        let err = CoreError::InsufficientStock {
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "name" };
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "code" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
