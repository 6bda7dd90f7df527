//! # Cart Model
//!
//! The live cart: line items, a discount, and totals derived on every read.
//!
//! ## Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ(unit price × quantity)                                    │
//! │  pre-tax  = max(0, subtotal − discount)                                 │
//! │  tax      = pre-tax × 8%          (tax never sees the undiscounted sum) │
//! │  total    = pre-tax + tax         (never negative)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached; every accessor recomputes from the lines.
//!
//! ## Invariants
//! - One line per product id (`add_or_increment` merges)
//! - Quantity is always ≥ 1; `decrement` at 1 does nothing
//! - Discount is never negative; it is NOT capped at the subtotal

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, TaxRate};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// A line in the cart.
///
/// Name, code and price are frozen when the product is added, so a catalog
/// refresh mid-sale does not reprice the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product id; unique within the cart.
    pub id: String,
    pub name: String,
    pub unit_price_cents: i64,
    /// National drug code at time of adding.
    pub code: Option<String>,
    pub quantity: i64,
}

impl LineItem {
    /// Creates a quantity-1 line from a product.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents.max(0),
            code: product.code.clone(),
            quantity: 1,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
    discount_cents: i64,
    tax_rate: TaxRate,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates an empty cart at the standard tax rate.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            discount_cents: 0,
            tax_rate: TaxRate::default(),
        }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Product ids in the cart, for the interaction lookup.
    pub fn product_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product: increments its line or appends a new one.
    ///
    /// ## Behavior
    /// ```text
    /// add_or_increment(amoxicillin)   → [Amoxicillin ×1]
    /// add_or_increment(amoxicillin)   → [Amoxicillin ×2]
    /// add_or_increment(ibuprofen)     → [Amoxicillin ×2, Ibuprofen ×1]
    /// ```
    pub fn add_or_increment(&mut self, product: &Product) -> CoreResult<()> {
        if self.item(&product.id).is_some() {
            return self.increment(&product.id);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(LineItem::from_product(product));
        Ok(())
    }

    /// Adds one unit to a line.
    pub fn increment(&mut self, item_id: &str) -> CoreResult<()> {
        let item = self.item_mut(item_id)?;
        let requested = item.quantity + 1;
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }
        item.quantity = requested;
        Ok(())
    }

    /// Removes one unit from a line. At quantity 1 this is a no-op; the
    /// line stays. Use [`Cart::remove`] to drop a line.
    pub fn decrement(&mut self, item_id: &str) -> CoreResult<()> {
        let item = self.item_mut(item_id)?;
        if item.quantity > 1 {
            item.quantity -= 1;
        }
        Ok(())
    }

    /// Whether the decrement control should be enabled for a line.
    pub fn can_decrement(&self, item_id: &str) -> bool {
        self.item(item_id).is_some_and(|i| i.quantity > 1)
    }

    /// Deletes a line regardless of quantity.
    pub fn remove(&mut self, item_id: &str) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        if self.items.len() == before {
            return Err(CoreError::LineNotFound(item_id.to_string()));
        }
        Ok(())
    }

    /// Empties the cart and resets the discount.
    pub fn clear(&mut self) {
        self.items.clear();
        self.discount_cents = 0;
    }

    /// Sets the discount. Negative amounts are treated as zero.
    ///
    /// A discount above the subtotal is accepted; the total then bottoms
    /// out at zero. Use [`Cart::discount_exceeds_subtotal`] to warn.
    pub fn set_discount(&mut self, amount: Money) {
        self.discount_cents = amount.floor_zero().cents();
    }

    fn item_mut(&mut self, item_id: &str) -> CoreResult<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::LineNotFound(item_id.to_string()))
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Subtotal after discount, floored at zero.
    pub fn pre_tax(&self) -> Money {
        (self.subtotal() - self.discount()).floor_zero()
    }

    /// Tax on the discounted subtotal.
    pub fn tax(&self) -> Money {
        self.pre_tax().calculate_tax(self.tax_rate)
    }

    pub fn total(&self) -> Money {
        self.pre_tax() + self.tax()
    }

    pub fn discount_exceeds_subtotal(&self) -> bool {
        self.discount() > self.subtotal()
    }

    /// All totals at once, for display and for sale submissions.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

/// Snapshot of a cart's derived totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal().cents(),
            discount_cents: cart.discount().cents(),
            tax_cents: cart.tax().cents(),
            total_cents: cart.total().cents(),
        }
    }
}
