//! # Cart Commands
//!
//! Adding, adjusting and clearing the live cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Tender  │────►│ Recorded │       │
//! │  │  Cart    │     │          │     │          │     │   Sale   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_product       complete_sale                      │
//! │                   scan              (sale.rs)                          │
//! │                   accept_search                                         │
//! │                   increment / decrement                                 │
//! │                   remove                                                │
//! │                   set_discount                                          │
//! │                        │                                                │
//! │                        ├──► hold_cart (held.rs)                        │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that change which products are in the cart re-check drug
//! interactions afterwards. Quantity and discount changes do not.

use serde::Serialize;
use tracing::{debug, warn};

use rxpos_core::validation::parse_amount;
use rxpos_core::{Cart, CartTotals, LineItem, Money, Product, ValidationError};

use super::Register;
use crate::error::{ApiError, ApiResult};

/// A cart line plus what the line controls need.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: LineItem,
    pub line_total_cents: i64,
    /// False at quantity 1; the minus button is disabled.
    pub can_decrement: bool,
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineView>,
    pub totals: CartTotals,
    pub discount_exceeds_subtotal: bool,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView {
                    item: item.clone(),
                    line_total_cents: item.line_total().cents(),
                    can_decrement: cart.can_decrement(&item.id),
                })
                .collect(),
            totals: cart.totals(),
            discount_exceeds_subtotal: cart.discount_exceeds_subtotal(),
        }
    }
}

impl Register {
    /// Gets the current cart contents.
    pub fn get_cart(&self) -> CartResponse {
        debug!("get_cart command");
        self.state.with_session(|s| CartResponse::from(&s.cart))
    }

    /// Adds a catalog product by id; a product already in the cart gets one
    /// more unit.
    ///
    /// ## Behavior
    /// - Price, name and code are frozen on the line when first added
    /// - The product goes to the front of the recently-added strip
    /// - Interactions are re-checked for the new product set
    pub async fn add_product(&self, product_id: &str) -> ApiResult<CartResponse> {
        debug!(product_id = %product_id, "add_product command");

        let product = self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            Ok::<Product, ApiError>(s.catalog.add(product_id, &mut s.cart)?)
        })?;

        self.after_product_change(&product).await;
        Ok(self.get_cart())
    }

    /// Barcode / typed code input.
    ///
    /// ```text
    /// scan("0093-3109")  → exact code match    → Amoxicillin 500mg
    /// scan("amox")       → no code match       → top search hit
    /// scan("zzz")        → nothing             → NOT_FOUND
    /// ```
    pub async fn scan(&self, code: &str) -> ApiResult<CartResponse> {
        debug!(code = %code, "scan command");

        let product = self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            Ok::<Product, ApiError>(s.catalog.scan(code, &mut s.cart)?)
        })?;

        self.after_product_change(&product).await;
        Ok(self.get_cart())
    }

    /// Enter in the search box: adds the top result and clears the query.
    pub async fn accept_search(&self) -> ApiResult<CartResponse> {
        debug!("accept_search command");

        let product = self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            Ok::<Product, ApiError>(s.catalog.accept(&mut s.cart)?)
        })?;

        self.after_product_change(&product).await;
        Ok(self.get_cart())
    }

    /// Adds one unit to a line.
    pub fn increment(&self, item_id: &str) -> ApiResult<CartResponse> {
        debug!(item_id = %item_id, "increment command");

        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            s.cart.increment(item_id)?;
            Ok(CartResponse::from(&s.cart))
        })
    }

    /// Removes one unit from a line. The quantity never drops below 1.
    pub fn decrement(&self, item_id: &str) -> ApiResult<CartResponse> {
        debug!(item_id = %item_id, "decrement command");

        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            s.cart.decrement(item_id)?;
            Ok(CartResponse::from(&s.cart))
        })
    }

    /// Deletes a line regardless of quantity.
    pub async fn remove(&self, item_id: &str) -> ApiResult<CartResponse> {
        debug!(item_id = %item_id, "remove command");

        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            s.cart.remove(item_id)?;
            Ok::<(), ApiError>(())
        })?;

        self.recheck_interactions().await;
        Ok(self.get_cart())
    }

    /// Sets the discount from the discount field's text.
    ///
    /// Empty clears the discount; a negative entry counts as zero. A
    /// discount above the subtotal is accepted and the total floors at
    /// zero.
    pub fn set_discount(&self, input: &str) -> ApiResult<CartResponse> {
        debug!(input = %input, "set_discount command");

        let amount = match parse_amount(input) {
            Ok(amount) => amount,
            Err(ValidationError::Required { .. }) | Err(ValidationError::Negative { .. }) => {
                Money::zero()
            }
            Err(e) => return Err(e.into()),
        };

        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            s.cart.set_discount(amount);
            if s.cart.discount_exceeds_subtotal() {
                warn!(
                    discount = s.cart.discount().cents(),
                    subtotal = s.cart.subtotal().cents(),
                    "Discount exceeds subtotal"
                );
            }
            Ok(CartResponse::from(&s.cart))
        })
    }

    /// Empties the cart, its discount and its interaction findings.
    pub fn clear_cart(&self) -> ApiResult<CartResponse> {
        debug!("clear_cart command");

        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            s.discard_cart();
            Ok(CartResponse::from(&s.cart))
        })
    }

    async fn after_product_change(&self, product: &Product) {
        debug!(product_id = %product.id, name = %product.name, "Added to cart");
        self.recheck_interactions().await;
    }
}
