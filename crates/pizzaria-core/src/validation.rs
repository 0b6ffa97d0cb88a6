//! # Validation Module
//!
//! Input validation for data crossing the system boundary.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: CLI argument parsing   (types, presence)                  │
//! │  Layer 2: THIS MODULE            (business rules, limits)           │
//! │  Layer 3: Database constraints   (CHECK, FK, NOT NULL)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures name the offending field so the caller can show a
//! precise message instead of a generic "invalid input".

use uuid::Uuid;

use crate::error::ValidationError;

// =============================================================================
// Limits
// =============================================================================

/// Maximum length for names (customers and products).
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length for free-form address fields.
pub const MAX_ADDRESS_LEN: usize = 240;

/// Maximum length for phone numbers.
pub const MAX_PHONE_LEN: usize = 32;

/// Maximum length for postal codes.
pub const MAX_POSTAL_CODE_LEN: usize = 16;

/// Maximum quantity for a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of line items per order.
pub const MAX_ORDER_LINES: usize = 50;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field: non-blank after trimming, within the
/// length limit.
pub fn validate_required_text(
    field: &str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
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
    Ok(())
}

/// Validates the fields of a new or edited customer record.
///
/// Complement is the only optional field; when present it still honors
/// the address length limit.
pub fn validate_customer_fields(
    name: &str,
    phone: &str,
    postal_code: &str,
    address: &str,
    complement: Option<&str>,
) -> Result<(), ValidationError> {
    validate_required_text("name", name, MAX_NAME_LEN)?;
    validate_required_text("phone", phone, MAX_PHONE_LEN)?;
    validate_required_text("postal_code", postal_code, MAX_POSTAL_CODE_LEN)?;
    validate_required_text("address", address, MAX_ADDRESS_LEN)?;
    if let Some(c) = complement {
        if c.chars().count() > MAX_ADDRESS_LEN {
            return Err(ValidationError::TooLong {
                field: "complement".to_string(),
                max: MAX_ADDRESS_LEN,
            });
        }
    }
    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    validate_required_text("name", name, MAX_NAME_LEN)
}

/// Validates a line-item quantity: integer in `1..=MAX_ITEM_QUANTITY`.
pub fn validate_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 1 || quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a price in cents: zero or positive.
pub fn validate_price_cents(field: &str, cents: i64) -> Result<(), ValidationError> {
    if cents < 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that a string is a well-formed UUID.
pub fn validate_uuid(field: &str, value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected a UUID".to_string(),
    })?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("name", "Maria", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("name", "", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("name", "   ", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("name", &"x".repeat(121), MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_customer_fields() {
        assert!(validate_customer_fields(
            "Maria Silva",
            "11 99999-0000",
            "01310-100",
            "Av. Paulista, 1000",
            Some("apto 42"),
        )
        .is_ok());

        assert!(validate_customer_fields("", "11", "01310-100", "Rua A", None).is_err());
        assert!(validate_customer_fields("Maria", "11", "", "Rua A", None).is_err());
    }

    #[test]
    fn test_quantity_range() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_price_sign() {
        assert!(validate_price_cents("price", 0).is_ok());
        assert!(validate_price_cents("price", 3000).is_ok());
        assert!(validate_price_cents("price", -1).is_err());
    }

    #[test]
    fn test_uuid_format() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "not-a-uuid").is_err());
    }
}
