//! CLI subcommand handlers, one module per entity.

use anyhow::Result;

use pizzaria_core::validation::validate_uuid;

pub mod customer;
pub mod order;
pub mod product;

/// Rejects malformed entity ids up front, so a mistyped id fails with a
/// format error instead of a not-found lookup.
pub(crate) fn check_id(field: &'static str, value: &str) -> Result<()> {
    validate_uuid(field, value)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_id() {
        assert!(check_id("customer id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(check_id("customer id", "not-a-uuid").is_err());
        assert!(check_id("customer id", "").is_err());
    }
}
