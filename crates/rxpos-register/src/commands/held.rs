//! # Held Cart Commands
//!
//! Parking a cart while the customer steps away, and bringing it back.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  live cart ──hold_cart(note)──► held list ──resume_cart(id)──► live    │
//! │      │                             │                                    │
//! │      └── emptied                   └── delete_held_cart(id)             │
//! │                                                                         │
//! │  Held carts live only as long as the register session.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use rxpos_core::{HeldCart, HeldCartRegistry};

use super::{CartResponse, Register};
use crate::error::{ApiError, ApiResult};

/// One row of the held-carts list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldCartSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
    pub total_cents: i64,
    pub note: Option<String>,
}

impl From<&HeldCart> for HeldCartSummary {
    fn from(held: &HeldCart) -> Self {
        HeldCartSummary {
            id: held.id().to_string(),
            created_at: held.created_at(),
            item_count: held.item_count(),
            total_cents: held.total().cents(),
            note: held.note().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeldCartsResponse {
    pub carts: Vec<HeldCartSummary>,
    /// "No held carts" when the list is empty.
    pub empty_message: Option<&'static str>,
}

impl From<&HeldCartRegistry> for HeldCartsResponse {
    fn from(registry: &HeldCartRegistry) -> Self {
        HeldCartsResponse {
            carts: registry.list().iter().map(HeldCartSummary::from).collect(),
            empty_message: registry.empty_state_message(),
        }
    }
}

impl Register {
    pub fn list_held_carts(&self) -> HeldCartsResponse {
        debug!("list_held_carts command");
        self.state.with_session(|s| HeldCartsResponse::from(&s.held))
    }

    /// Snapshots the live cart into the held list and empties it.
    pub fn hold_cart(&self, note: Option<String>) -> ApiResult<HeldCartSummary> {
        debug!("hold_cart command");

        let summary = self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            let summary = HeldCartSummary::from(s.held.hold(&s.cart, note)?);
            s.discard_cart();
            Ok::<HeldCartSummary, ApiError>(summary)
        })?;

        info!(
            held_id = %summary.id,
            items = summary.item_count,
            total = summary.total_cents,
            "Cart held"
        );
        Ok(summary)
    }

    /// Restores a held cart as the live cart and removes it from the list.
    ///
    /// ## Errors
    /// - `CONFLICT` if the live cart has items (hold or clear it first)
    /// - `NOT_FOUND` for an unknown id
    pub async fn resume_cart(&self, held_id: &str) -> ApiResult<CartResponse> {
        debug!(held_id = %held_id, "resume_cart command");

        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            if !s.cart.is_empty() {
                return Err(ApiError::conflict(
                    "Hold or clear the current cart before resuming another",
                ));
            }
            s.cart = s.held.resume(held_id)?;
            Ok(())
        })?;

        info!(held_id = %held_id, "Held cart resumed");
        self.recheck_interactions().await;
        Ok(self.get_cart())
    }

    pub fn delete_held_cart(&self, held_id: &str) -> ApiResult<HeldCartsResponse> {
        debug!(held_id = %held_id, "delete_held_cart command");

        self.state.with_session_mut(|s| {
            s.held.delete(held_id)?;
            Ok(HeldCartsResponse::from(&s.held))
        })
    }
}
