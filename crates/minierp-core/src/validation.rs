//! # Validation Module
//!
//! Field-level validation rules shared by entity factories and the API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Request DTO (serde)                                       │
//! │  └── Type validation (deserialization)                              │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE + entity factories                            │
//! │  └── Field rules and business invariants                            │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / CHECK constraints                                   │
//! │  ├── UNIQUE constraints                                             │
//! │  └── Foreign key constraints                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (item, partner, warehouse, user).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must not exceed `max` characters
pub fn validate_name(field: &'static str, name: &str, max: usize) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

/// Validates a business code ("IC000001", "WH000001", "CUS000001", ...).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only ASCII alphanumerics, hyphens and underscores
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required { field: "code" });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code",
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code",
            reason: "must contain only letters, numbers, hyphens, and underscores",
        });
    }

    Ok(())
}

/// Validates an employee number.
///
/// Same character set as business codes. Matching against stored employee
/// numbers is case-sensitive; no normalization happens here.
pub fn validate_employee_number(employee_number: &str) -> ValidationResult<()> {
    let value = employee_number.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "employee_number",
        });
    }

    if value.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "employee_number",
            max: 50,
        });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "employee_number",
            reason: "must contain only letters, numbers, hyphens, and underscores",
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a movement or order-line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "qty" });
    }

    Ok(())
}

/// Validates a price or cost in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price",
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
