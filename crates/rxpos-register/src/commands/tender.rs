//! # Tender Commands
//!
//! The payment form: customer name, method, cash received.
//!
//! ## Tender Modal
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TOTAL                                             $27.00               │
//! │                                                                         │
//! │  Customer: [ Jane Doe              ]                                    │
//! │                                                                         │
//! │  [ Cash ]  [ Card ]  [ Digital ]  [ Insurance ]                         │
//! │                                                                         │
//! │  Received: [ 30.00 ]   [Exact] [+$27] [+$30]                            │
//! │  Change:   $3.00                                                        │
//! │                                                                         │
//! │  [ Complete Sale ]   ◄── disabled while blocked_reason is set           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Picking card, digital or insurance submits the sale straight away when
//! nothing blocks it.

use serde::Serialize;
use tracing::debug;

use rxpos_core::validation::{parse_amount, validate_customer_name};
use rxpos_core::{Money, PaymentMethod, Receipt, TenderState, TenderWorkflow};

use super::Register;
use crate::error::ApiResult;

/// The tender form as the register shows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderResponse {
    pub state: TenderState,
    pub method: Option<PaymentMethod>,
    pub customer_name: String,
    pub total_cents: i64,
    pub amount_received_cents: Option<i64>,
    pub change_due_cents: i64,
    pub quick_amounts_cents: Vec<i64>,
    pub can_complete: bool,
    pub blocked_reason: Option<&'static str>,
    pub pending: bool,
}

impl From<&TenderWorkflow> for TenderResponse {
    fn from(tender: &TenderWorkflow) -> Self {
        TenderResponse {
            state: tender.state(),
            method: tender.method(),
            customer_name: tender.customer_name().to_string(),
            total_cents: tender.total().cents(),
            amount_received_cents: tender.amount_received().map(|m| m.cents()),
            change_due_cents: tender.change_due().cents(),
            quick_amounts_cents: tender.quick_amounts().iter().map(|m| m.cents()).collect(),
            can_complete: tender.can_complete(),
            blocked_reason: tender.blocked_reason(),
            pending: tender.is_pending(),
        }
    }
}

impl Register {
    pub fn get_tender(&self) -> TenderResponse {
        debug!("get_tender command");
        self.state.with_session(|s| TenderResponse::from(&s.tender))
    }

    /// Blank means walk-in.
    pub fn set_customer_name(&self, name: &str) -> ApiResult<TenderResponse> {
        debug!("set_customer_name command");

        let name = validate_customer_name(name)?;
        self.state.with_session_mut(|s| {
            s.ensure_not_submitting()?;
            s.tender.set_customer_name(name);
            Ok(TenderResponse::from(&s.tender))
        })
    }

    /// Chooses a payment method.
    ///
    /// ## Returns
    /// - `Some(receipt)` when a non-cash method completed and the sale was
    ///   recorded
    /// - `None` when the form now waits for more input (cash, or a blocked
    ///   non-cash selection)
    pub async fn select_payment_method(&self, method: PaymentMethod) -> ApiResult<Option<Receipt>> {
        debug!(method = %method, "select_payment_method command");

        if !method.requires_amount() {
            self.ensure_interactions_checked().await?;
        }

        let prepared = self.state.with_session_mut(|s| {
            s.tender
                .select_method(method)
                .map(|result| super::sale::PreparedSale::new(s, result))
        });

        match prepared {
            Some(prepared) => self.submit(prepared).await.map(Some),
            None => Ok(None),
        }
    }

    /// Cash received, from the amount field's text.
    pub fn set_amount_received(&self, input: &str) -> ApiResult<TenderResponse> {
        debug!(input = %input, "set_amount_received command");

        let amount = parse_amount(input)?;
        self.state.with_session_mut(|s| {
            s.tender.set_amount_received(amount)?;
            Ok(TenderResponse::from(&s.tender))
        })
    }

    /// "Exact" button.
    pub fn exact_amount(&self) -> ApiResult<TenderResponse> {
        debug!("exact_amount command");

        self.state.with_session_mut(|s| {
            s.tender.exact()?;
            Ok(TenderResponse::from(&s.tender))
        })
    }

    /// Quick-fill button; adds to what is already entered.
    pub fn add_quick_amount(&self, amount: Money) -> ApiResult<TenderResponse> {
        debug!(amount = amount.cents(), "add_quick_amount command");

        self.state.with_session_mut(|s| {
            s.tender.add_quick_amount(amount)?;
            Ok(TenderResponse::from(&s.tender))
        })
    }

    pub fn clear_amount(&self) -> TenderResponse {
        debug!("clear_amount command");

        self.state.with_session_mut(|s| {
            s.tender.clear_amount();
            TenderResponse::from(&s.tender)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::harness;
    use crate::error::ErrorKind;
    use rxpos_core::{Money, PaymentMethod, TenderState};

    #[tokio::test]
    async fn test_cash_flow_and_change() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();

        assert!(h
            .register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap()
            .is_none());

        let tender = h.register.get_tender();
        assert_eq!(tender.state, TenderState::MethodSelected);
        assert_eq!(tender.total_cents, 1350);
        assert_eq!(tender.quick_amounts_cents, vec![1400, 1500, 2000]);
        assert_eq!(tender.blocked_reason, Some("amount received is below the total"));

        let tender = h.register.set_amount_received("20").unwrap();
        assert_eq!(tender.state, TenderState::AmountEntered);
        assert_eq!(tender.change_due_cents, 650);
        assert!(tender.can_complete);
    }

    #[tokio::test]
    async fn test_quick_amounts_accumulate() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();

        h.register.add_quick_amount(Money::from_units(10)).unwrap();
        let tender = h.register.add_quick_amount(Money::from_units(5)).unwrap();
        assert_eq!(tender.amount_received_cents, Some(1500));

        let tender = h.register.exact_amount().unwrap();
        assert_eq!(tender.amount_received_cents, Some(1350));
        assert_eq!(tender.change_due_cents, 0);

        let tender = h.register.clear_amount();
        assert_eq!(tender.amount_received_cents, None);
        assert_eq!(tender.state, TenderState::MethodSelected);
    }

    #[tokio::test]
    async fn test_quick_amount_rejects_bad_input_and_keeps_amount() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();

        let err = h.register.set_amount_received("92233720368547758").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let tender = h.register.set_amount_received("1000000").unwrap();
        assert_eq!(tender.amount_received_cents, Some(100_000_000));

        let err = h
            .register
            .add_quick_amount(Money::from_cents(-500))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = h.register.add_quick_amount(Money::zero()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let tender = h.register.add_quick_amount(Money::from_units(10)).unwrap();
        assert_eq!(tender.amount_received_cents, Some(100_001_000));

        // The session is still usable after the refusals.
        let tender = h.register.exact_amount().unwrap();
        assert_eq!(tender.amount_received_cents, Some(1350));
    }

    #[tokio::test]
    async fn test_amount_rules() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();

        let err = h.register.set_amount_received("10").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();
        let err = h.register.set_amount_received("-5").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = h.register.set_amount_received("1.234").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_card_completes_immediately() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();
        h.register.set_customer_name("  Jane Doe ").unwrap();

        let receipt = h
            .register
            .select_payment_method(PaymentMethod::Card)
            .await
            .unwrap()
            .expect("card sale should complete");

        assert_eq!(receipt.customer_name, "Jane Doe");
        assert_eq!(receipt.payment_method, PaymentMethod::Card);
        assert_eq!(receipt.total_cents, 1350);
        assert!(h.register.get_cart().items.is_empty());
        assert_eq!(h.register.get_tender().state, TenderState::Idle);
    }

    #[tokio::test]
    async fn test_card_on_empty_cart_waits() {
        let h = harness().await;

        let outcome = h
            .register
            .select_payment_method(PaymentMethod::Insurance)
            .await
            .unwrap();
        assert!(outcome.is_none());

        let tender = h.register.get_tender();
        assert_eq!(tender.state, TenderState::MethodSelected);
        assert_eq!(tender.blocked_reason, Some("nothing to charge"));
        assert!(h.backend.recorded_sales().await.is_empty());
    }
}
