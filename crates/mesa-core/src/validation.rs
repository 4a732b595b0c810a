//! # Validation Module
//!
//! Input validation utilities for Mesa POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Server action (Rust)                                         │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::validation::{validate_name, validate_quantity};
//!
//! let name = validate_name("name", "  Margherita ", 100).unwrap();
//! assert_eq!(name, "Margherita");
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_PRICE_DELTA_CENTS, MAX_TABLE_CAPACITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted entity name.
pub const MAX_NAME_LEN: usize = 100;

/// Longest accepted free text (descriptions, special requests).
pub const MAX_TEXT_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max` characters
///
/// ## Example
/// ```rust
/// use mesa_core::validation::validate_name;
///
/// assert!(validate_name("name", "Drinks", 100).is_ok());
/// assert!(validate_name("name", "   ", 100).is_err());
/// ```
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates optional free text.
///
/// Blank input collapses to `None`.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(Some(value.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a table number (≥ 1).
pub fn validate_table_number(number: i64) -> ValidationResult<()> {
    if number < 1 {
        return Err(ValidationError::MustBePositive {
            field: "table number".to_string(),
        });
    }
    Ok(())
}

/// Validates a table's seating capacity (1..=50).
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if !(1..=MAX_TABLE_CAPACITY).contains(&capacity) {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 1,
            max: MAX_TABLE_CAPACITY,
        });
    }
    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order Panel: Add Item                                                  │
/// │                                                                         │
/// │  Server taps "+" or types a quantity: 5                                │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → line is written, totals recomputed                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Zero is allowed (complimentary items)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use mesa_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a modifier's price delta. Negative deltas are discounts.
pub fn validate_price_delta(cents: i64) -> ValidationResult<()> {
    if !(-MAX_PRICE_DELTA_CENTS..=MAX_PRICE_DELTA_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price delta".to_string(),
            min: -MAX_PRICE_DELTA_CENTS,
            max: MAX_PRICE_DELTA_CENTS,
        });
    }

    Ok(())
}

/// Validates a payment amount in cents (> 0).
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0..=10000).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", " Drinks ", MAX_NAME_LEN).unwrap(), "Drinks");
        assert!(validate_name("name", "", MAX_NAME_LEN).is_err());
        assert!(validate_name("name", "   ", MAX_NAME_LEN).is_err());
        assert!(validate_name("name", &"A".repeat(101), MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(validate_optional_text("notes", Some("  "), 10).unwrap(), None);
        assert_eq!(
            validate_optional_text("notes", Some(" no ice "), 10).unwrap(),
            Some("no ice".to_string())
        );
        assert!(validate_optional_text("notes", Some("way too long"), 5).is_err());
    }

    #[test]
    fn test_validate_table_number_and_capacity() {
        assert!(validate_table_number(1).is_ok());
        assert!(validate_table_number(0).is_err());

        assert!(validate_capacity(1).is_ok());
        assert!(validate_capacity(50).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(51).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents(5_000_000_000_000_000_000).is_err());
    }

    #[test]
    fn test_validate_price_delta() {
        assert!(validate_price_delta(0).is_ok());
        assert!(validate_price_delta(-50).is_ok());
        assert!(validate_price_delta(MAX_PRICE_DELTA_CENTS).is_ok());
        assert!(validate_price_delta(-MAX_PRICE_DELTA_CENTS).is_ok());
        assert!(validate_price_delta(MAX_PRICE_DELTA_CENTS + 1).is_err());
        assert!(validate_price_delta(i64::MIN).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(800).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
