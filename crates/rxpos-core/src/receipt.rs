//! # Receipt Renderer
//!
//! Projects a finished sale into a [`Receipt`] and renders it as fixed-width
//! text for the receipt printer.
//!
//! ```text
//!             RxPOS Pharmacy
//!              12 Main St
//! ----------------------------------------
//! Sale      3f2a...
//! Date      2026-10-18 14:03
//! Customer  Walk-in Customer
//! ----------------------------------------
//! Amoxicillin 500mg
//!   2 x $12.50                      $25.00
//! ----------------------------------------
//! Subtotal                          $25.00
//! Tax (8%)                           $2.00
//! TOTAL                             $27.00
//! Payment                             Cash
//! Received                          $30.00
//! Change                             $3.00
//! ```
//!
//! Amounts always go through [`CurrencyConfig::format`]; no symbol is
//! written here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineItem};
use crate::currency::CurrencyConfig;
use crate::money::Money;
use crate::types::{PaymentMethod, StoreSettings, TaxRate, TenderResult};

/// Width of the printed receipt in characters.
pub const RECEIPT_WIDTH: usize = 40;

/// One printed line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub code: Option<String>,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<&LineItem> for ReceiptLine {
    fn from(item: &LineItem) -> Self {
        ReceiptLine {
            name: item.name.clone(),
            code: item.code.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_total_cents: item.line_total().cents(),
        }
    }
}

/// A completed sale, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_rate: TaxRate,
    pub tax_cents: i64,
    pub total_cents: i64,
    /// Cash only.
    pub amount_received_cents: Option<i64>,
    /// Cash only.
    pub change_due_cents: Option<i64>,
}

impl Receipt {
    /// Builds the receipt from the cart as it was at completion.
    pub fn from_sale(
        cart: &Cart,
        tender: &TenderResult,
        sale_id: Option<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let total = cart.total();
        let received = tender.amount_received();

        Receipt {
            sale_id,
            date,
            customer_name: tender.customer_name().to_string(),
            payment_method: tender.method(),
            lines: cart.items().iter().map(ReceiptLine::from).collect(),
            subtotal_cents: cart.subtotal().cents(),
            discount_cents: cart.discount().cents(),
            tax_rate: cart.tax_rate(),
            tax_cents: cart.tax().cents(),
            total_cents: total.cents(),
            amount_received_cents: received.map(|m| m.cents()),
            change_due_cents: received.map(|m| (m - total).floor_zero().cents()),
        }
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    pub fn change_due(&self) -> Option<Money> {
        self.change_due_cents.map(Money::from_cents)
    }

    /// Printable text using the store's name, location and currency.
    pub fn render(&self, settings: &StoreSettings) -> String {
        let currency = &settings.currency;
        let money = |cents: i64| currency.format(Money::from_cents(cents));
        let rule = "-".repeat(RECEIPT_WIDTH);
        let mut out: Vec<String> = Vec::new();

        out.push(centered(&settings.pharmacy_name));
        if !settings.location.trim().is_empty() {
            out.push(centered(settings.location.trim()));
        }
        out.push(rule.clone());

        if let Some(id) = &self.sale_id {
            out.push(format!("{:<10}{}", "Sale", id));
        }
        out.push(format!("{:<10}{}", "Date", self.date.format("%Y-%m-%d %H:%M")));
        out.push(format!("{:<10}{}", "Customer", self.customer_name));
        out.push(rule.clone());

        for line in &self.lines {
            out.push(line.name.clone());
            let qty = format!(
                "  {} x {}",
                line.quantity,
                currency.format(Money::from_cents(line.unit_price_cents))
            );
            out.push(columns(&qty, &money(line.line_total_cents)));
        }
        out.push(rule.clone());

        out.push(columns("Subtotal", &money(self.subtotal_cents)));
        if self.discount_cents > 0 {
            out.push(columns("Discount", &money(-self.discount_cents)));
        }
        out.push(columns(
            &format!("Tax ({}%)", self.tax_rate.percentage()),
            &money(self.tax_cents),
        ));
        out.push(columns("TOTAL", &money(self.total_cents)));
        out.push(columns("Payment", self.payment_method.label()));

        if let Some(received) = self.amount_received_cents {
            out.push(columns("Received", &money(received)));
        }
        if let Some(change) = self.change_due_cents {
            out.push(columns("Change", &money(change)));
        }

        out.push(rule);
        out.push(centered("Thank you"));
        out.join("\n")
    }
}

fn centered(text: &str) -> String {
    format!("{:^width$}", text, width = RECEIPT_WIDTH)
        .trim_end()
        .to_string()
}

/// Label on the left, value flush right.
fn columns(label: &str, value: &str) -> String {
    let used = label.chars().count() + value.chars().count();
    let gap = RECEIPT_WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", label, " ".repeat(gap), value)
}

// =============================================================================
// Unit Tests
// =============================================================================
