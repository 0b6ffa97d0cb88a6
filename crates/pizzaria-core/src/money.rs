//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Centavos                                     │
//! │    R$ 30.00 is 3000, R$ 5.00 is 500, their sum is exactly 3500      │
//! │    Totals recomputed any number of times never drift                │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two-decimal display form (`R$ 30.00`) exists only at formatting
//! time; every calculation, database column and API value is in cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative intermediates (price adjustments)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: `Money::from_cents` or `Money::parse_decimal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use pizzaria_core::money::Money;
    ///
    /// let price = Money::from_cents(3000); // R$ 30.00
    /// assert_eq!(price.cents(), 3000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use pizzaria_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1200); // R$ 12.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.cents(), 2400); // R$ 24.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Parses a decimal price string into Money without going through floats.
    ///
    /// Accepts `30`, `30.5`, `30.50` and the comma variant `30,50` that the
    /// menu data uses. At most two fraction digits are allowed; a third
    /// digit is rejected rather than rounded.
    ///
    /// ```rust
    /// use pizzaria_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("30.00").unwrap().cents(), 3000);
    /// assert_eq!(Money::parse_decimal("30,5").unwrap().cents(), 3050);
    /// assert_eq!(Money::parse_decimal("6").unwrap().cents(), 600);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Self, ValidationError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let invalid = || ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "expected a decimal amount like 30.00".to_string(),
        };

        let (negative, raw) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let normalized = raw.replace(',', ".");
        let mut parts = normalized.splitn(2, '.');
        let whole = parts.next().unwrap_or("");
        let frac = parts.next().unwrap_or("");

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let cents = whole * 100 + frac_cents;
        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the fixed receipt form: `R$ 30.00`.
///
/// This is the form receipts are built from, so it must stay byte-stable:
/// two fraction digits, `.` separator, `R$ ` prefix.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(3099);
        assert_eq!(money.cents(), 3099);
        assert_eq!(money.reais(), 30);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(3000)), "R$ 30.00");
        assert_eq!(format!("{}", Money::from_cents(605)), "R$ 6.05");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(3000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 3500);
        assert_eq!((a - b).cents(), 2500);
        assert_eq!((a * 3).cents(), 9000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(600);
        assert_eq!(unit_price.multiply_quantity(4).cents(), 2400);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("30.00").unwrap().cents(), 3000);
        assert_eq!(Money::parse_decimal("30").unwrap().cents(), 3000);
        assert_eq!(Money::parse_decimal("30.5").unwrap().cents(), 3050);
        assert_eq!(Money::parse_decimal("30,50").unwrap().cents(), 3050);
        assert_eq!(Money::parse_decimal("0.99").unwrap().cents(), 99);
        assert_eq!(Money::parse_decimal("-5.50").unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1.999").is_err());
        assert!(Money::parse_decimal("1.2.3").is_err());
        assert!(Money::parse_decimal(".50").is_err());
    }

    /// Re-summing the same cart any number of times must never drift.
    #[test]
    fn test_no_rounding_drift() {
        let prices = [Money::from_cents(3000), Money::from_cents(500), Money::from_cents(600)];
        let first: i64 = prices.iter().map(|m| m.cents()).sum();
        for _ in 0..1000 {
            let again: i64 = prices.iter().map(|m| m.cents()).sum();
            assert_eq!(again, first);
        }
        assert_eq!(first, 4100);
    }
}
