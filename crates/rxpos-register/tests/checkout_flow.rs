//! End-to-end register flows against the in-memory backend.

use std::sync::Arc;

use rxpos_core::{PaymentMethod, TenderState};
use rxpos_register::{
    ErrorKind, InMemoryBackend, MemoryNotifier, Notification, Register, RegisterConfig,
};

async fn register() -> (Register, Arc<InMemoryBackend>, Arc<MemoryNotifier>) {
    let backend = Arc::new(InMemoryBackend::seeded());
    let notifier = Arc::new(MemoryNotifier::new());

    let mut config = RegisterConfig::default();
    config.store.pharmacy_name = "Corner Pharmacy".to_string();
    config.store.location = "12 Main St".to_string();
    config.register.operator = "rph-lee".to_string();

    let register = Register::new(config, backend.clone()).with_notifier(notifier.clone());
    register.refresh_catalog().await.unwrap();
    (register, backend, notifier)
}

#[tokio::test]
async fn cash_sale_from_search_to_receipt() {
    let (register, backend, notifier) = register().await;

    register.search("amox").unwrap();
    register.accept_search().await.unwrap();
    register.scan("0904-5853").await.unwrap();
    register.increment("amox-500").unwrap();

    // 2 × 12.50 + 6.99 = 31.99; less 1.99 = 30.00; tax 2.40
    let cart = register.set_discount("1.99").unwrap();
    assert_eq!(cart.totals.subtotal_cents, 3199);
    assert_eq!(cart.totals.total_cents, 3240);

    // no rule pairs amoxicillin with ibuprofen
    let safety = register.get_safety();
    assert_eq!(safety.clear_message, Some("No interactions found"));

    register.set_customer_name("Jane Doe").unwrap();
    register.select_payment_method(PaymentMethod::Cash).await.unwrap();
    let tender = register.get_tender();
    assert_eq!(tender.quick_amounts_cents, vec![3300, 3500, 4000]);

    register.add_quick_amount(rxpos_core::Money::from_units(40)).unwrap();
    let receipt = register.complete_sale().await.unwrap();

    assert_eq!(receipt.sale_id.as_deref(), Some("S-000001"));
    assert_eq!(receipt.change_due_cents, Some(760));

    let text = register.receipt_text(&receipt);
    assert!(text.contains("Corner Pharmacy"));
    assert!(text.contains("12 Main St"));
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Discount"));
    assert!(text.contains("Tax (8%)"));
    assert!(text.contains("$7.60"));

    let view = register.view();
    assert!(view.cart.items.is_empty());
    assert_eq!(view.tender.state, TenderState::Idle);
    assert_eq!(view.recent[0].id, "ibu-200");

    assert_eq!(backend.recorded_sales().await.len(), 1);
    assert_eq!(
        notifier.entries(),
        vec![Notification::Success("Sale S-000001 completed".to_string())]
    );
}

#[tokio::test]
async fn contraindicated_pair_needs_override() {
    let (register, backend, _notifier) = register().await;

    register.add_product("warf-5").await.unwrap();
    register.add_product("asa-81").await.unwrap();

    let outcome = register.select_payment_method(PaymentMethod::Card).await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(
        register.get_tender().blocked_reason,
        Some("checkout is blocked by unresolved interactions")
    );

    let record = register.override_safety(None).unwrap();
    assert_eq!(record.actor, "rph-lee");

    // Re-selecting the method completes now that the gate is open.
    let receipt = register
        .select_payment_method(PaymentMethod::Card)
        .await
        .unwrap()
        .expect("sale should complete after override");
    assert_eq!(receipt.payment_method, PaymentMethod::Card);

    let sales = backend.recorded_sales().await;
    let submitted = sales[0].safety_override.as_ref().unwrap();
    assert_eq!(submitted.finding_ids, vec!["warf-5:asa-81"]);

    // Next customer starts clean.
    assert!(register.get_safety().override_record.is_none());
}

#[tokio::test]
async fn backend_outage_then_retry_records_once() {
    let (register, backend, notifier) = register().await;

    register.add_product("simva-20").await.unwrap();
    register.select_payment_method(PaymentMethod::Cash).await.unwrap();
    register.exact_amount().unwrap();

    backend.fail_with("permission denied for table sales").await;
    let err = register.complete_sale().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RemoteFailure);
    assert_eq!(notifier.errors(), vec!["permission denied for table sales"]);

    // Nothing was lost and the form can be submitted again.
    let view = register.view();
    assert_eq!(view.cart.items.len(), 1);
    assert_eq!(view.tender.state, TenderState::AmountEntered);
    assert!(view.tender.can_complete);

    backend.recover().await;
    register.complete_sale().await.unwrap();
    register.complete_sale().await.unwrap_err();

    assert_eq!(backend.recorded_sales().await.len(), 1);
}

#[tokio::test]
async fn cart_is_locked_while_sale_is_pending() {
    let (register, _backend, _notifier) = register().await;

    register.add_product("amox-500").await.unwrap();
    register.select_payment_method(PaymentMethod::Cash).await.unwrap();
    register.exact_amount().unwrap();

    register
        .state()
        .with_session_mut(|s| s.tender.complete().unwrap());

    let err = register.add_product("ibu-200").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    let err = register.hold_cart(None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn held_cart_round_trip() {
    let (register, _backend, _notifier) = register().await;

    register.add_product("clari-500").await.unwrap();
    register.add_product("antacid").await.unwrap();
    let held = register.hold_cart(Some("customer fetching card".to_string())).unwrap();

    register.add_product("amox-500").await.unwrap();
    register.select_payment_method(PaymentMethod::Digital).await.unwrap().unwrap();

    let listed = register.list_held_carts();
    assert_eq!(listed.carts.len(), 1);
    assert_eq!(listed.carts[0].note.as_deref(), Some("customer fetching card"));

    let cart = register.resume_cart(&held.id).await.unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.totals.total_cents, held.total_cents);
    assert_eq!(register.list_held_carts().empty_message, Some("No held carts"));
}
