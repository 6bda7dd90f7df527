//! # Register Session State
//!
//! The live cart and everything hanging off it, behind one mutex.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  with_session_mut(|s| ...)                                              │
//! │        │                                                                │
//! │        ├── closure mutates cart / catalog / tender / safety / held     │
//! │        │                                                                │
//! │        └── sync_tender()                                                │
//! │              tender.total    ◄── cart.total()                           │
//! │              tender.disabled ◄── safety.checkout_blocked()              │
//! │                                                                         │
//! │  NOTE: The lock is never held across an await. Commands copy what     │
//! │        they need out, call the backend, then lock again to apply.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use rxpos_core::{
    Cart, CatalogView, HeldCartRegistry, SafetyPanel, TenderResult, TenderWorkflow,
};

use crate::backend::SaleSubmission;
use crate::error::{ApiError, ApiResult};

/// Everything one register is working on.
#[derive(Debug, Default)]
pub struct Session {
    pub cart: Cart,
    pub catalog: CatalogView,
    pub tender: TenderWorkflow,
    pub safety: SafetyPanel,
    pub held: HeldCartRegistry,

    /// Sorted product ids the current findings were fetched for.
    checked_products: Option<Vec<String>>,

    /// Last submission the backend did not confirm; its sale id is reused
    /// when the same cart is submitted again.
    unconfirmed_sale: Option<SaleSubmission>,
}

impl Session {
    pub fn new(catalog: CatalogView) -> Self {
        Session {
            catalog,
            ..Session::default()
        }
    }

    /// Pushes cart total and safety gate into the tender form.
    pub fn sync_tender(&mut self) {
        self.tender.set_total(self.cart.total());
        self.tender.set_disabled(self.safety.checkout_blocked());
    }

    /// Refuses cart changes while a sale is being submitted.
    pub fn ensure_not_submitting(&self) -> ApiResult<()> {
        if self.tender.is_pending() {
            return Err(ApiError::conflict("A sale is being submitted"));
        }
        Ok(())
    }

    /// Product ids to check, sorted so the order of adds does not matter.
    pub fn product_key(&self) -> Vec<String> {
        let mut ids = self.cart.product_ids();
        ids.sort();
        ids
    }

    /// True when the findings were fetched for exactly the current cart.
    pub fn interactions_current(&self) -> bool {
        match &self.checked_products {
            Some(checked) => *checked == self.product_key(),
            None => self.cart.is_empty(),
        }
    }

    /// Records that findings now match `products`.
    pub fn mark_checked(&mut self, products: Vec<String>) {
        self.checked_products = Some(products);
    }

    /// Reuses the sale id of an unconfirmed submission for the same lines,
    /// totals and tender; otherwise `None`.
    pub fn retry_sale_id(&self, tender: &TenderResult) -> Option<String> {
        self.unconfirmed_sale
            .as_ref()
            .filter(|s| {
                s.lines == self.cart.items()
                    && s.totals == self.cart.totals()
                    && s.tender == *tender
            })
            .map(|s| s.sale_id.clone())
    }

    pub fn remember_unconfirmed(&mut self, submission: SaleSubmission) {
        self.unconfirmed_sale = Some(submission);
    }

    /// Back to an empty register after a sale, keeping catalog and held
    /// carts.
    pub fn finish_sale(&mut self) {
        self.cart.clear();
        self.safety.reset();
        self.tender.settle();
        self.checked_products = None;
        self.unconfirmed_sale = None;
    }

    /// Drops the live cart and its safety state (after a hold or a clear).
    pub fn discard_cart(&mut self) {
        self.cart.clear();
        self.safety.reset();
        self.tender.settle();
        self.checked_products = None;
    }
}

/// Thread-safe handle to the session.
///
/// A plain `Mutex` suffices: every critical section is short and
/// synchronous.
#[derive(Debug, Clone)]
pub struct RegisterState {
    session: Arc<Mutex<Session>>,
}

impl RegisterState {
    pub fn new(session: Session) -> Self {
        RegisterState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a function with write access, then re-syncs the tender.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut session);
        session.sync_tender();
        result
    }
}

impl Default for RegisterState {
    fn default() -> Self {
        RegisterState::new(Session::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rxpos_core::{InteractionFinding, Money, PaymentMethod, Product, Severity};

    fn product(id: &str) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_cents(1000))
    }

    #[test]
    fn test_mutation_syncs_tender() {
        let state = RegisterState::default();

        state.with_session_mut(|s| s.cart.add_or_increment(&product("a")).unwrap());
        let total = state.with_session(|s| s.tender.total());
        assert_eq!(total.cents(), 1080);

        state.with_session_mut(|s| {
            s.safety.set_findings(vec![InteractionFinding::new(
                "f",
                "A + B",
                Severity::Major,
                "",
            )])
        });
        assert!(state.with_session(|s| s.tender.is_disabled()));
    }

    #[test]
    fn test_interactions_current_tracks_product_set() {
        let mut session = Session::default();
        assert!(session.interactions_current());

        session.cart.add_or_increment(&product("b")).unwrap();
        session.cart.add_or_increment(&product("a")).unwrap();
        assert!(!session.interactions_current());

        session.mark_checked(vec!["a".to_string(), "b".to_string()]);
        assert!(session.interactions_current());

        session.cart.increment("a").unwrap();
        assert!(session.interactions_current());

        session.cart.remove("b").unwrap();
        assert!(!session.interactions_current());
    }

    #[test]
    fn test_retry_sale_id_requires_same_cart_and_tender() {
        let mut session = Session::default();
        session.cart.add_or_increment(&product("a")).unwrap();

        let cash = TenderResult::new("", PaymentMethod::Cash, Some(Money::from_cents(2000)));
        session.remember_unconfirmed(SaleSubmission {
            sale_id: "sale-1".to_string(),
            tender: cash.clone(),
            lines: session.cart.items().to_vec(),
            totals: session.cart.totals(),
            safety_override: None,
            submitted_at: Utc::now(),
        });

        assert_eq!(session.retry_sale_id(&cash).as_deref(), Some("sale-1"));

        let more_cash = TenderResult::new("", PaymentMethod::Cash, Some(Money::from_cents(5000)));
        assert_eq!(session.retry_sale_id(&more_cash), None);
        let card = TenderResult::new("", PaymentMethod::Card, None);
        assert_eq!(session.retry_sale_id(&card), None);
        let named =
            TenderResult::new("Jane Doe", PaymentMethod::Cash, Some(Money::from_cents(2000)));
        assert_eq!(session.retry_sale_id(&named), None);

        session.cart.increment("a").unwrap();
        assert_eq!(session.retry_sale_id(&cash), None);
    }
}
