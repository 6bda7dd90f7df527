//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  At the counter that shows up as a cash drawer that is one cent off    │
//! │  or a "change due" of $0.00000001.                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 count of minor units.                         │
//! │    Tax is the only division and it rounds explicitly.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rxpos_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price * 3_i64;            // 32.97
//! assert_eq!(line.cents(), 3297);
//! assert_eq!(line.to_string(), "32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results such as `subtotal - discount`
///   may go negative before they are floored
/// - **No currency attached**: the register runs in one currency, chosen by
///   the store settings and applied only when formatting
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► LineItem.unit_price ──► line total ──► Cart.subtotal
///                                                              │
///                         Cart.discount ───────────────────────┤
///                                                              ▼
///                                         pre-tax ──► tax ──► Cart.total
///                                                              │
///                      amount received ──► change due ◄────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use rxpos_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units (dollars).
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    ///
    /// ```rust
    /// use rxpos_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(250).floor_zero().cents(), 250);
    /// ```
    #[inline]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// Callers pass the already-discounted, non-negative pre-tax amount.
    ///
    /// ```rust
    /// use rxpos_core::money::Money;
    /// use rxpos_core::types::TaxRate;
    ///
    /// let pre_tax = Money::from_cents(1999);
    /// // 19.99 × 8% = 1.5992 → 1.60
    /// assert_eq!(pre_tax.calculate_tax(TaxRate::from_bps(800)).cents(), 160);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large carts cannot overflow the intermediate product
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Addition that reports overflow instead of wrapping.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Rounds up to the next multiple of `units` whole units.
    ///
    /// Used for the cash quick-fill buttons: a total of 23.40 rounds to
    /// 24.00, 25.00 and 30.00 for `units` of 1, 5 and 10.
    ///
    /// ```rust
    /// use rxpos_core::money::Money;
    ///
    /// let total = Money::from_cents(2340);
    /// assert_eq!(total.round_up_to_units(1).cents(), 2400);
    /// assert_eq!(total.round_up_to_units(5).cents(), 2500);
    /// assert_eq!(total.round_up_to_units(10).cents(), 3000);
    /// assert_eq!(Money::from_cents(2500).round_up_to_units(5).cents(), 2500);
    /// ```
    pub fn round_up_to_units(&self, units: i64) -> Money {
        let step = units.max(1) * 100;
        if self.0 <= 0 {
            return Money::zero();
        }
        Money(((self.0 + step - 1) / step) * step)
    }

    /// Plain two-decimal rendering with no symbol, e.g. `"-12.50"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the plain decimal amount. Symbols and separators belong to
/// [`crate::currency::CurrencyConfig::format`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
