//! # Sale Commands
//!
//! Completing the tender and recording the sale.
//!
//! ## Sale Submission
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Complete Sale                                        │
//! │                                                                         │
//! │  1. Interactions current for this cart?  no → re-check (fail = abort)  │
//! │  2. tender.complete()                     gate refuses → VALIDATION    │
//! │     └── tender now pending; cart edits are CONFLICT                     │
//! │  3. SaleSubmission { sale_id, lines, totals, tender, override }        │
//! │     └── sale_id reused when retrying the same cart and tender          │
//! │  4. backend.record_sale()                                               │
//! │        │                                                                │
//! │        ├── Ok(sale number)                                              │
//! │        │     receipt built from the cart snapshot                       │
//! │        │     cart, safety and tender reset; held carts untouched       │
//! │        │                                                                │
//! │        └── Err                                                          │
//! │              toast with the service's message                           │
//! │              tender reopened, cart kept as it was                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use rxpos_core::{Cart, Receipt, TenderResult};

use super::Register;
use crate::backend::SaleSubmission;
use crate::error::{ApiError, ApiResult};
use crate::state::Session;

/// A completed tender and the cart it was completed against.
pub(crate) struct PreparedSale {
    submission: SaleSubmission,
    cart: Cart,
}

impl PreparedSale {
    pub(crate) fn new(session: &Session, tender: TenderResult) -> Self {
        let sale_id = session
            .retry_sale_id(&tender)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        PreparedSale {
            submission: SaleSubmission {
                sale_id,
                tender,
                lines: session.cart.items().to_vec(),
                totals: session.cart.totals(),
                safety_override: session.safety.override_record().cloned(),
                submitted_at: Utc::now(),
            },
            cart: session.cart.clone(),
        }
    }
}

impl Register {
    /// Completes the tender and records the sale.
    ///
    /// ## Returns
    /// The receipt, carrying the backend's sale number.
    ///
    /// ## Errors
    /// - `VALIDATION` when the tender gate refuses (see `get_tender`)
    /// - `REMOTE_FAILURE` when the interaction re-check or the recording
    ///   fails; the cart is left intact for a retry
    pub async fn complete_sale(&self) -> ApiResult<Receipt> {
        debug!("complete_sale command");

        self.ensure_interactions_checked().await?;

        let prepared = self.state.with_session_mut(|s| {
            let result = s.tender.complete()?;
            Ok::<PreparedSale, ApiError>(PreparedSale::new(s, result))
        })?;

        self.submit(prepared).await
    }

    /// Plain-text receipt using the configured store header and currency.
    pub fn receipt_text(&self, receipt: &Receipt) -> String {
        receipt.render(&self.config.store_settings())
    }

    pub(crate) async fn submit(&self, prepared: PreparedSale) -> ApiResult<Receipt> {
        let PreparedSale { submission, cart } = prepared;

        info!(
            sale_id = %submission.sale_id,
            total = submission.totals.total_cents,
            method = %submission.tender.method(),
            overridden = submission.safety_override.is_some(),
            "Submitting sale"
        );

        let outcome = self
            .remote("record_sale", self.backend.record_sale(&submission))
            .await;

        match outcome {
            Ok(sale_number) => {
                let receipt = Receipt::from_sale(
                    &cart,
                    &submission.tender,
                    Some(sale_number.clone()),
                    Utc::now(),
                );

                self.state.with_session_mut(|s| s.finish_sale());
                self.notifier
                    .notify_success(&format!("Sale {} completed", sale_number));

                info!(
                    sale_id = %submission.sale_id,
                    sale_number = %sale_number,
                    "Sale recorded"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(sale_id = %submission.sale_id, "Sale not recorded, cart kept for retry");
                self.state.with_session_mut(|s| {
                    s.tender.reopen();
                    s.remember_unconfirmed(submission);
                });
                Err(e)
            }
        }
    }

    /// Makes sure the findings match the cart before money changes hands.
    pub(crate) async fn ensure_interactions_checked(&self) -> ApiResult<()> {
        if self.state.with_session(|s| s.interactions_current()) {
            return Ok(());
        }
        debug!("Interactions stale, re-checking before checkout");
        self.refresh_interactions().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::harness;
    use crate::error::ErrorKind;
    use rxpos_core::{Money, PaymentMethod, TenderResult, TenderState};

    #[tokio::test]
    async fn test_cash_sale_records_and_resets() {
        let h = harness().await;
        h.register.add_product("amox-500").await.unwrap();
        h.register.add_product("amox-500").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();
        h.register.set_amount_received("30").unwrap();

        let receipt = h.register.complete_sale().await.unwrap();

        assert_eq!(receipt.sale_id.as_deref(), Some("S-000001"));
        assert_eq!(receipt.total_cents, 2700);
        assert_eq!(receipt.change_due_cents, Some(300));
        assert_eq!(h.notifier.successes(), vec!["Sale S-000001 completed"]);

        let sales = h.backend.recorded_sales().await;
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].lines[0].quantity, 2);

        assert!(h.register.get_cart().items.is_empty());
        assert_eq!(h.register.get_tender().state, TenderState::Idle);
    }

    #[tokio::test]
    async fn test_blocked_tender_is_not_submitted() {
        let h = harness().await;
        h.register.add_product("warf-5").await.unwrap();
        h.register.add_product("asa-81").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();
        h.register.exact_amount().unwrap();

        let err = h.register.complete_sale().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(h.backend.recorded_sales().await.is_empty());
    }

    #[tokio::test]
    async fn test_override_travels_with_sale() {
        let h = harness().await;
        h.register.add_product("warf-5").await.unwrap();
        h.register.add_product("asa-81").await.unwrap();
        h.register.override_safety(Some("pharmacist-on-duty")).unwrap();

        h.register
            .select_payment_method(PaymentMethod::Card)
            .await
            .unwrap()
            .unwrap();

        let sales = h.backend.recorded_sales().await;
        let record = sales[0].safety_override.as_ref().unwrap();
        assert_eq!(record.actor, "pharmacist-on-duty");
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_cart_and_reuses_sale_id() {
        let h = harness().await;
        h.register.add_product("ibu-200").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();
        h.register.set_amount_received("10").unwrap();

        h.backend.fail_with("payments ledger offline").await;
        let err = h.register.complete_sale().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RemoteFailure);
        assert_eq!(err.message, "payments ledger offline");

        let tender = h.register.get_tender();
        assert_eq!(tender.state, TenderState::AmountEntered);
        assert!(!tender.pending);
        assert_eq!(h.register.get_cart().items.len(), 1);
        let tender = TenderResult::new("", PaymentMethod::Cash, Some(Money::from_units(10)));
        let first_id = h
            .register
            .state()
            .with_session(|s| s.retry_sale_id(&tender))
            .unwrap();

        h.backend.recover().await;
        h.register.complete_sale().await.unwrap();

        let sales = h.backend.recorded_sales().await;
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sale_id, first_id);
    }

    #[tokio::test]
    async fn test_changed_tender_gets_new_sale_id() {
        let h = harness().await;
        h.register.add_product("ibu-200").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();
        h.register.set_amount_received("10").unwrap();

        h.backend.fail_with("payments ledger offline").await;
        h.register.complete_sale().await.unwrap_err();
        let failed = TenderResult::new("", PaymentMethod::Cash, Some(Money::from_units(10)));
        let failed_id = h
            .register
            .state()
            .with_session(|s| s.retry_sale_id(&failed))
            .unwrap();

        h.backend.recover().await;
        h.register.set_amount_received("20").unwrap();
        let receipt = h.register.complete_sale().await.unwrap();
        assert_eq!(receipt.change_due_cents, Some(1245));

        let sales = h.backend.recorded_sales().await;
        assert_eq!(sales.len(), 1);
        assert_ne!(sales[0].sale_id, failed_id);
        assert_eq!(sales[0].tender.amount_received(), Some(Money::from_units(20)));
    }

    #[tokio::test]
    async fn test_stale_interactions_rechecked_at_checkout() {
        let h = harness().await;
        h.backend.fail_with("interaction service down").await;
        h.register.add_product("warf-5").await.unwrap();
        h.register.add_product("asa-81").await.unwrap();
        h.register
            .select_payment_method(PaymentMethod::Cash)
            .await
            .unwrap();
        h.register.exact_amount().unwrap();

        // Still down: checkout is refused rather than skipping the check.
        let err = h.register.complete_sale().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RemoteFailure);

        // Back up: the re-check finds the contraindication and blocks.
        h.backend.recover().await;
        let err = h.register.complete_sale().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(h.register.get_safety().checkout_blocked);
    }

    #[tokio::test]
    async fn test_receipt_text_uses_store_header() {
        let h = harness().await;
        h.register.add_product("antacid").await.unwrap();
        let receipt = h
            .register
            .select_payment_method(PaymentMethod::Digital)
            .await
            .unwrap()
            .unwrap();

        let text = h.register.receipt_text(&receipt);
        assert!(text.contains("RxPOS Pharmacy"));
        assert!(text.contains("Calcium Carbonate Antacid"));
        assert!(text.contains("$3.77"));
    }
}
