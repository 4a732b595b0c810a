//! # Money Module
//!
//! Provides the `Money` type used for every price, modifier delta and order
//! total in Mesa POS.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    Burger 12.10 + Extra cheese 1.20 = 13.299999999999999  ❌           │
//! │                                                                         │
//! │  With integer cents:                                                    │
//! │    1210 + 120 = 1330 cents = $13.30                        ✅           │
//! │                                                                         │
//! │  The only rounding step is tax, and it happens exactly once per order. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::money::Money;
//!
//! let burger = Money::from_cents(1210);
//! let cheese = Money::from_cents(120);
//! let line = (burger + cheese) * 2;
//! assert_eq!(line.cents(), 2660);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that modifiers can carry negative deltas ("no cheese -$0.50").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
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

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half away from zero at the cent.
    ///
    /// ## Implementation
    /// Integer math on the magnitude: `(|amount| * bps + 5000) / 10000`, then
    /// the sign is put back. Rounding the magnitude keeps negative amounts
    /// symmetric with positive ones (-50 at 8% is -4, like 50 is 4).
    ///
    /// ## Example
    /// ```rust
    /// use mesa_core::money::Money;
    /// use mesa_core::types::TaxRate;
    ///
    /// // $12.35 at 8% = $0.988 → $0.99
    /// let tax = Money::from_cents(1235).calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 99);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Order lines changed
    ///      │
    ///      ▼
    /// subtotal = Σ line totals
    ///      │
    ///      ▼
    /// calculate_tax(8%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// total = subtotal + tax
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so that large subtotals cannot overflow the intermediate
        let scaled = self.0 as i128 * rate.bps() as i128;
        let magnitude = (scaled.abs() + 5000) / 10000;
        // |tax| <= |amount| for rates up to 100%, so it fits back into i64
        let tax_cents = if scaled < 0 { -magnitude } else { magnitude };
        Money::from_cents(tax_cents as i64)
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies by a quantity, or `None` on overflow.
    #[inline]
    pub fn checked_mul(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display ("$12.35"). The front end formats for the locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
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
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-50)), "-$0.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        assert_eq!(a.checked_add(Money::from_cents(-250)), Some(Money::from_cents(750)));
        assert_eq!(a.checked_mul(999), Some(Money::from_cents(999_000)));

        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MAX / 2 + 1).checked_mul(2), None);
    }

    #[test]
    fn test_tax_at_eight_percent() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 80);
        // 0.988 rounds up
        assert_eq!(Money::from_cents(1235).calculate_tax(rate).cents(), 99);
        // 100.48 rounds down
        assert_eq!(Money::from_cents(1256).calculate_tax(rate).cents(), 100);
        assert_eq!(Money::from_cents(625).calculate_tax(rate).cents(), 50);
        // half a cent rounds up
        assert_eq!(Money::from_cents(1).calculate_tax(TaxRate::from_bps(5000)).cents(), 1);
        assert_eq!(Money::zero().calculate_tax(rate).cents(), 0);
    }

    #[test]
    fn test_tax_on_negative_amounts_mirrors_positive() {
        let rate = TaxRate::from_bps(800);
        // -4.0 exactly
        assert_eq!(Money::from_cents(-50).calculate_tax(rate).cents(), -4);
        assert_eq!(Money::from_cents(-1235).calculate_tax(rate).cents(), -99);
        assert_eq!(Money::from_cents(-1256).calculate_tax(rate).cents(), -100);
        assert_eq!(Money::from_cents(-1).calculate_tax(TaxRate::from_bps(5000)).cents(), -1);

        for cents in [1, 6, 50, 625, 1235, 99_999] {
            let up = Money::from_cents(cents).calculate_tax(rate).cents();
            let down = Money::from_cents(-cents).calculate_tax(rate).cents();
            assert_eq!(down, -up, "asymmetric tax for {cents}");
        }
    }

    #[test]
    fn test_tax_at_full_rate_does_not_overflow() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.calculate_tax(TaxRate::from_bps(10000)), max);
    }

    #[test]
    fn test_negative_checks() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::from_cents(1).is_negative());
    }
}
