//! # Tender Workflow
//!
//! Captures how the customer pays and decides when the sale may complete.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──select_method──► MethodSelected                                │
//! │                               │                                         │
//! │            ┌──────────────────┼─────────────────────┐                   │
//! │            │ Cash             │ Card/Digital/       │                   │
//! │            ▼                  │ Insurance           │                   │
//! │      AmountEntered            │ (completes at once  │                   │
//! │            │                  │  when allowed)      │                   │
//! │            └──complete()──────┴─────────────────────┘                   │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                          Completed (pending)                            │
//! │                               │                                         │
//! │              settle() ◄───────┴───────► reopen()                        │
//! │          sale persisted                 persistence failed;             │
//! │          back to Idle                   form kept for retry             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Completion Gate
//! `complete()` refuses when any of these hold:
//! - a completion is already pending (double-submit)
//! - the total is zero
//! - the caller set `disabled` (unresolved critical interactions)
//! - no method is selected
//! - cash is selected and the amount received is below the total
//!
//! The workflow never persists anything. It hands a [`TenderResult`] to the
//! caller, who records the sale and then settles or reopens.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, TenderResult};

/// Where the tender form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TenderState {
    #[default]
    Idle,
    MethodSelected,
    AmountEntered,
    Completed,
}

/// Whole-unit steps used for the cash quick-fill buttons.
const QUICK_FILL_UNITS: [i64; 3] = [1, 5, 10];

/// The payment form.
#[derive(Debug, Clone, Default)]
pub struct TenderWorkflow {
    state: TenderState,
    total: Money,
    disabled: bool,
    pending: bool,
    customer_name: String,
    method: Option<PaymentMethod>,
    amount_received: Option<Money>,
}

impl TenderWorkflow {
    pub fn new() -> Self {
        TenderWorkflow::default()
    }

    // =========================================================================
    // Inputs From the Caller
    // =========================================================================

    /// Sets the amount due. Called whenever the cart changes.
    pub fn set_total(&mut self, total: Money) {
        self.total = total.floor_zero();
    }

    /// Blocks or unblocks completion from outside (the safety gate).
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> TenderState {
        self.state
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// True between `complete()` and `settle()`/`reopen()`.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn amount_received(&self) -> Option<Money> {
        self.amount_received
    }

    /// Change owed to a cash customer; never negative, zero for non-cash.
    pub fn change_due(&self) -> Money {
        match (self.method, self.amount_received) {
            (Some(PaymentMethod::Cash), Some(received)) => (received - self.total).floor_zero(),
            _ => Money::zero(),
        }
    }

    /// Quick-fill amounts for the current total.
    ///
    /// The total rounded up to the next 1, 5 and 10 whole units, with
    /// repeats dropped.
    ///
    /// ```rust
    /// use rxpos_core::money::Money;
    /// use rxpos_core::tender::TenderWorkflow;
    ///
    /// let mut tender = TenderWorkflow::new();
    /// tender.set_total(Money::from_cents(2340));
    /// let amounts: Vec<i64> = tender.quick_amounts().iter().map(|m| m.cents()).collect();
    /// assert_eq!(amounts, vec![2400, 2500, 3000]);
    /// ```
    pub fn quick_amounts(&self) -> Vec<Money> {
        let mut amounts: Vec<Money> = Vec::with_capacity(QUICK_FILL_UNITS.len());
        for units in QUICK_FILL_UNITS {
            let amount = self.total.round_up_to_units(units);
            if amount.is_positive() && !amounts.contains(&amount) {
                amounts.push(amount);
            }
        }
        amounts
    }

    /// Why completion is refused right now, if it is.
    pub fn blocked_reason(&self) -> Option<&'static str> {
        if self.pending {
            return Some("a sale is already being submitted");
        }
        if !self.total.is_positive() {
            return Some("nothing to charge");
        }
        if self.disabled {
            return Some("checkout is blocked by unresolved interactions");
        }
        match self.method {
            None => Some("select a payment method"),
            Some(PaymentMethod::Cash) => match self.amount_received {
                Some(received) if received >= self.total => None,
                _ => Some("amount received is below the total"),
            },
            Some(_) => None,
        }
    }

    pub fn can_complete(&self) -> bool {
        self.blocked_reason().is_none()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Chooses a payment method.
    ///
    /// Non-cash methods are verified by their own terminals, so picking one
    /// completes the tender immediately when the gate allows and returns the
    /// result. Otherwise the form stays in `MethodSelected`.
    ///
    /// Ignored while a completion is pending.
    pub fn select_method(&mut self, method: PaymentMethod) -> Option<TenderResult> {
        if self.pending {
            return None;
        }

        if self.method != Some(method) {
            self.amount_received = None;
        }
        self.method = Some(method);
        self.state = if self.amount_received.is_some() {
            TenderState::AmountEntered
        } else {
            TenderState::MethodSelected
        };

        if method.requires_amount() {
            return None;
        }
        self.complete().ok()
    }

    /// Records the cash handed over.
    pub fn set_amount_received(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_cash()?;
        if amount.is_negative() {
            return Err(ValidationError::Negative {
                field: "amount received".to_string(),
            }
            .into());
        }
        self.amount_received = Some(amount);
        self.state = TenderState::AmountEntered;
        Ok(())
    }

    /// Empties the amount field.
    pub fn clear_amount(&mut self) {
        if self.pending {
            return;
        }
        self.amount_received = None;
        if self.method.is_some() {
            self.state = TenderState::MethodSelected;
        }
    }

    /// "Exact" button: amount received equals the total.
    pub fn exact(&mut self) -> CoreResult<()> {
        self.set_amount_received(self.total)
    }

    /// Adds a quick-fill amount to whatever is already entered.
    ///
    /// The amount must be positive; a sum past `i64` cents is refused.
    pub fn add_quick_amount(&mut self, amount: Money) -> CoreResult<()> {
        if !amount.is_positive() {
            return Err(ValidationError::InvalidFormat {
                field: "quick amount".to_string(),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        let current = self.amount_received.unwrap_or_default();
        let sum = current
            .checked_add(amount)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount received".to_string(),
                reason: "too large".to_string(),
            })?;
        self.set_amount_received(sum)
    }

    /// Completes the tender and marks it pending.
    pub fn complete(&mut self) -> CoreResult<TenderResult> {
        if let Some(reason) = self.blocked_reason() {
            return Err(CoreError::tender_blocked(reason));
        }
        let method = self
            .method
            .ok_or_else(|| CoreError::tender_blocked("select a payment method"))?;

        self.state = TenderState::Completed;
        self.pending = true;
        Ok(TenderResult::new(
            &self.customer_name,
            method,
            self.amount_received,
        ))
    }

    /// The sale was persisted: reset the form for the next customer.
    ///
    /// Total and the disabled flag are kept; the caller re-syncs them from
    /// the (now empty) cart.
    pub fn settle(&mut self) {
        *self = TenderWorkflow {
            total: self.total,
            disabled: self.disabled,
            ..TenderWorkflow::default()
        };
    }

    /// Persisting the sale failed: clear the pending flag and put the form
    /// back the way it was so the cashier can retry.
    pub fn reopen(&mut self) {
        if !self.pending {
            return;
        }
        self.pending = false;
        self.state = match (self.method, self.amount_received) {
            (Some(_), Some(_)) => TenderState::AmountEntered,
            (Some(_), None) => TenderState::MethodSelected,
            (None, _) => TenderState::Idle,
        };
    }

    fn ensure_cash(&self) -> CoreResult<()> {
        if self.pending {
            return Err(CoreError::tender_blocked("a sale is already being submitted"));
        }
        match self.method {
            Some(PaymentMethod::Cash) => Ok(()),
            Some(other) => Err(CoreError::AmountNotApplicable {
                method: other.label().to_string(),
            }),
            None => Err(CoreError::tender_blocked("select a payment method")),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WALK_IN_CUSTOMER;

    fn tender_for(total_cents: i64) -> TenderWorkflow {
        let mut tender = TenderWorkflow::new();
        tender.set_total(Money::from_cents(total_cents));
        tender
    }

    #[test]
    fn test_cash_gate_at_total() {
        let mut tender = tender_for(2700);
        assert!(tender.select_method(PaymentMethod::Cash).is_none());
        assert_eq!(tender.state(), TenderState::MethodSelected);
        assert!(!tender.can_complete());

        tender.set_amount_received(Money::from_cents(2699)).unwrap();
        assert_eq!(tender.state(), TenderState::AmountEntered);
        assert!(!tender.can_complete());
        assert_eq!(tender.change_due(), Money::zero());

        tender.set_amount_received(Money::from_cents(2700)).unwrap();
        assert!(tender.can_complete());
        assert_eq!(tender.change_due(), Money::zero());

        tender.set_amount_received(Money::from_cents(5000)).unwrap();
        assert_eq!(tender.change_due().cents(), 2300);
    }

    #[test]
    fn test_non_cash_completes_immediately_without_amount() {
        for method in [
            PaymentMethod::Card,
            PaymentMethod::Digital,
            PaymentMethod::Insurance,
        ] {
            let mut tender = tender_for(1000);
            let result = tender.select_method(method).expect("completes");
            assert_eq!(result.method(), method);
            assert_eq!(result.amount_received(), None);
            assert_eq!(result.customer_name(), WALK_IN_CUSTOMER);
            assert_eq!(tender.state(), TenderState::Completed);
            assert!(tender.is_pending());
        }
    }

    #[test]
    fn test_non_cash_blocked_by_safety_gate() {
        let mut tender = tender_for(1000);
        tender.set_disabled(true);

        assert!(tender.select_method(PaymentMethod::Card).is_none());
        assert_eq!(tender.state(), TenderState::MethodSelected);
        assert_eq!(
            tender.blocked_reason(),
            Some("checkout is blocked by unresolved interactions")
        );

        tender.set_disabled(false);
        assert!(tender.complete().is_ok());
    }

    #[test]
    fn test_zero_total_cannot_complete() {
        let mut tender = tender_for(0);
        assert!(tender.select_method(PaymentMethod::Card).is_none());
        assert!(matches!(
            tender.complete(),
            Err(CoreError::TenderBlocked { .. })
        ));
    }

    #[test]
    fn test_amount_rejected_for_non_cash_and_negative() {
        let mut tender = tender_for(1000);
        assert!(matches!(
            tender.set_amount_received(Money::from_cents(100)),
            Err(CoreError::TenderBlocked { .. })
        ));

        tender.set_disabled(true);
        tender.select_method(PaymentMethod::Insurance);
        assert!(matches!(
            tender.set_amount_received(Money::from_cents(100)),
            Err(CoreError::AmountNotApplicable { .. })
        ));

        tender.select_method(PaymentMethod::Cash);
        assert!(matches!(
            tender.set_amount_received(Money::from_cents(-1)),
            Err(CoreError::Validation(ValidationError::Negative { .. }))
        ));
    }

    #[test]
    fn test_quick_amounts_deduplicate() {
        assert_eq!(
            tender_for(2500).quick_amounts(),
            vec![Money::from_cents(2500), Money::from_cents(3000)]
        );
        assert_eq!(tender_for(4000).quick_amounts(), vec![Money::from_cents(4000)]);
        assert!(tender_for(0).quick_amounts().is_empty());
    }

    #[test]
    fn test_quick_amount_adds_to_entered_amount() {
        let mut tender = tender_for(2340);
        tender.select_method(PaymentMethod::Cash);

        tender.add_quick_amount(Money::from_cents(1000)).unwrap();
        tender.add_quick_amount(Money::from_cents(2500)).unwrap();
        assert_eq!(tender.amount_received(), Some(Money::from_cents(3500)));

        tender.exact().unwrap();
        assert_eq!(tender.amount_received(), Some(Money::from_cents(2340)));
    }

    #[test]
    fn test_quick_amount_must_be_positive() {
        let mut tender = tender_for(2340);
        tender.select_method(PaymentMethod::Cash);
        tender.set_amount_received(Money::from_cents(3000)).unwrap();

        for amount in [Money::zero(), Money::from_cents(-1000)] {
            assert!(matches!(
                tender.add_quick_amount(amount),
                Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
            ));
        }
        assert_eq!(tender.amount_received(), Some(Money::from_cents(3000)));
    }

    #[test]
    fn test_quick_amount_overflow_is_refused() {
        let mut tender = tender_for(2340);
        tender.select_method(PaymentMethod::Cash);
        tender
            .set_amount_received(Money::from_cents(i64::MAX - 50))
            .unwrap();

        assert!(matches!(
            tender.add_quick_amount(Money::from_units(10)),
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert_eq!(
            tender.amount_received(),
            Some(Money::from_cents(i64::MAX - 50))
        );
    }

    #[test]
    fn test_pending_blocks_double_submit() {
        let mut tender = tender_for(1000);
        tender.select_method(PaymentMethod::Cash);
        tender.exact().unwrap();

        let result = tender.complete().unwrap();
        assert_eq!(result.amount_received(), Some(Money::from_cents(1000)));
        assert!(matches!(
            tender.complete(),
            Err(CoreError::TenderBlocked { .. })
        ));
        assert!(tender.select_method(PaymentMethod::Card).is_none());
        assert_eq!(tender.method(), Some(PaymentMethod::Cash));
    }

    #[test]
    fn test_reopen_preserves_form() {
        let mut tender = tender_for(1000);
        tender.set_customer_name("Jane Doe");
        tender.select_method(PaymentMethod::Cash);
        tender.set_amount_received(Money::from_cents(2000)).unwrap();
        tender.complete().unwrap();

        tender.reopen();
        assert!(!tender.is_pending());
        assert_eq!(tender.state(), TenderState::AmountEntered);
        assert_eq!(tender.customer_name(), "Jane Doe");
        assert_eq!(tender.amount_received(), Some(Money::from_cents(2000)));
        assert!(tender.can_complete());
    }

    #[test]
    fn test_settle_resets_form() {
        let mut tender = tender_for(1000);
        tender.set_customer_name("Jane Doe");
        tender.select_method(PaymentMethod::Card);

        tender.settle();
        assert_eq!(tender.state(), TenderState::Idle);
        assert!(!tender.is_pending());
        assert_eq!(tender.method(), None);
        assert_eq!(tender.customer_name(), "");
        assert_eq!(tender.total().cents(), 1000);
    }

    #[test]
    fn test_switching_method_clears_amount() {
        let mut tender = tender_for(1000);
        tender.set_disabled(true);
        tender.select_method(PaymentMethod::Cash);
        tender.set_amount_received(Money::from_cents(1000)).unwrap();

        tender.select_method(PaymentMethod::Card);
        assert_eq!(tender.amount_received(), None);
        assert_eq!(tender.change_due(), Money::zero());
    }
}
