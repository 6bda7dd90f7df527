//! # Held Carts
//!
//! Suspended transactions. A cashier holds the current cart to serve the
//! next customer and resumes it later.
//!
//! ```text
//! live cart ──hold(note)──► HeldCart { id, created_at, item count, total }
//!                                 │
//!             resume(id) ◄────────┤   removes the entry; a held cart
//!                                 │   cannot be resumed twice
//!             delete(id) ◄────────┘
//! ```
//!
//! The registry never touches the live cart; clearing it after a hold and
//! replacing it on resume is the caller's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Text shown in place of an empty held-cart list.
pub const NO_HELD_CARTS_MESSAGE: &str = "No held carts";

/// A snapshot of a suspended cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeldCart {
    id: String,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    item_count: i64,
    total_cents: i64,
    note: Option<String>,
    cart: Cart,
}

impl HeldCart {
    fn snapshot(cart: &Cart, note: Option<String>) -> Self {
        HeldCart {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            item_count: cart.total_quantity(),
            total_cents: cart.total().cents(),
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            cart: cart.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Units across all lines at the time of holding.
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

/// The set of held carts, in the order they were held.
#[derive(Debug, Clone, Default)]
pub struct HeldCartRegistry {
    carts: Vec<HeldCart>,
}

impl HeldCartRegistry {
    pub fn new() -> Self {
        HeldCartRegistry::default()
    }

    /// Snapshots `cart`. Empty carts are not worth holding.
    pub fn hold(&mut self, cart: &Cart, note: Option<String>) -> CoreResult<&HeldCart> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        self.carts.push(HeldCart::snapshot(cart, note));
        self.carts.last().ok_or(CoreError::EmptyCart)
    }

    /// Removes the held cart and hands back its cart for restoring.
    pub fn resume(&mut self, id: &str) -> CoreResult<Cart> {
        let index = self.position(id)?;
        Ok(self.carts.remove(index).cart)
    }

    pub fn delete(&mut self, id: &str) -> CoreResult<()> {
        let index = self.position(id)?;
        self.carts.remove(index);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&HeldCart> {
        self.carts.iter().find(|c| c.id == id)
    }

    pub fn list(&self) -> &[HeldCart] {
        &self.carts
    }

    pub fn len(&self) -> usize {
        self.carts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }

    /// `Some("No held carts")` when there is nothing to list.
    pub fn empty_state_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_HELD_CARTS_MESSAGE)
    }

    fn position(&self, id: &str) -> CoreResult<usize> {
        self.carts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::HeldCartNotFound(id.to_string()))
    }
}
