//! # Domain Types
//!
//! Core domain types used throughout RxPOS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │ InteractionFinding  │   │  TenderResult   │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id             │   │  id                 │   │  customer_name  │   │
//! │  │  name           │   │  pair               │   │  method         │   │
//! │  │  code (NDC)     │   │  severity           │   │  amount (cash)  │   │
//! │  │  category       │   │  counseled          │   └─────────────────┘   │
//! │  │  price_cents    │   └─────────────────────┘                         │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │ PaymentMethod   │   │    Severity     │   │ Organization / Role │   │
//! │  │  Cash           │   │  Contraindicated│   │  Owner              │   │
//! │  │  Card           │   │  Major          │   │  Admin              │   │
//! │  │  Digital        │   │  Moderate       │   │  Pharmacist         │   │
//! │  │  Insurance      │   │  Minor          │   │  Cashier            │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::CurrencyConfig;
use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_TAX_RATE_BPS, WALK_IN_CUSTOMER};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the pharmacy catalog, as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier.
    pub id: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// National drug code or barcode; the scanner matches on this.
    #[serde(default)]
    pub code: Option<String>,

    /// Shelf category ("Antibiotics", "Analgesics", ...).
    #[serde(default)]
    pub category: Option<String>,

    /// Price in cents.
    pub price_cents: i64,
}

impl Product {
    /// Creates a product with no code or category.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            code: None,
            category: None,
            price_cents: price.cents(),
        }
    }

    /// Sets the national drug code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
///
/// Only cash is counted at the register. Card, digital wallet and
/// insurance claims are verified by their own terminals and always cover
/// the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Digital,
    Insurance,
}

impl PaymentMethod {
    /// Every method, in the order the tender screen lists them.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Digital,
        PaymentMethod::Insurance,
    ];

    /// True when the cashier must enter the amount handed over.
    #[inline]
    pub const fn requires_amount(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// Label printed on receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Digital => "Digital",
            PaymentMethod::Insurance => "Insurance",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "digital" | "wallet" | "mobile" => Ok(PaymentMethod::Digital),
            "insurance" => Ok(PaymentMethod::Insurance),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Interaction Findings
// =============================================================================

/// Clinical severity of a drug interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The pair must not be dispensed together.
    Contraindicated,
    Major,
    Moderate,
    Minor,
}

impl Severity {
    /// Contraindicated and major findings block checkout until overridden.
    #[inline]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Severity::Contraindicated | Severity::Major)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Severity::Contraindicated => "Contraindicated",
            Severity::Major => "Major",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
        }
    }
}

/// One interaction between two products in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InteractionFinding {
    pub id: String,

    /// The interacting pair, e.g. "Warfarin + Aspirin".
    pub pair: String,

    pub severity: Severity,

    /// Clinical guidance shown to the pharmacist.
    pub message: String,

    /// Set once the pharmacist has counseled the patient on this finding.
    #[serde(default)]
    pub counseled: bool,
}

impl InteractionFinding {
    pub fn new(
        id: impl Into<String>,
        pair: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        InteractionFinding {
            id: id.into(),
            pair: pair.into(),
            severity,
            message: message.into(),
            counseled: false,
        }
    }
}

// =============================================================================
// Tender Result
// =============================================================================

/// The outcome of a completed tender.
///
/// Built once by the tender workflow and never mutated; it travels to the
/// receipt renderer and to the backend with the sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TenderResult {
    customer_name: String,
    method: PaymentMethod,
    amount_received_cents: Option<i64>,
}

impl TenderResult {
    /// Creates a result.
    ///
    /// A blank customer name becomes [`WALK_IN_CUSTOMER`]; the amount is
    /// dropped for methods that do not take one.
    pub fn new(customer_name: &str, method: PaymentMethod, amount_received: Option<Money>) -> Self {
        let name = customer_name.trim();
        TenderResult {
            customer_name: if name.is_empty() {
                WALK_IN_CUSTOMER.to_string()
            } else {
                name.to_string()
            },
            method,
            amount_received_cents: if method.requires_amount() {
                amount_received.map(|m| m.cents())
            } else {
                None
            },
        }
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Cash handed over; `None` for every non-cash method.
    pub fn amount_received(&self) -> Option<Money> {
        self.amount_received_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Organizations
// =============================================================================

/// A pharmacy organization (tenant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
}

/// A member's role inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Pharmacist,
    Cashier,
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "pharmacist" => Ok(Role::Pharmacist),
            "cashier" => Ok(Role::Cashier),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

/// A user's membership in an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub organization_id: String,
    pub email: String,
    pub role: Role,
}

// =============================================================================
// Store Settings
// =============================================================================

/// Read-only store settings consumed by the receipt renderer.
///
/// Persisted by the surrounding application; the core only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub pharmacy_name: String,
    pub location: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub currency: CurrencyConfig,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            pharmacy_name: "RxPOS Pharmacy".to_string(),
            location: String::new(),
            logo_url: None,
            currency: CurrencyConfig::default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_default_is_eight_percent() {
        let rate = TaxRate::default();
        assert_eq!(rate.bps(), 800);
        assert!((rate.percentage() - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Debit".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "insurance".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Insurance
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_only_cash_requires_amount() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.requires_amount(), method == PaymentMethod::Cash);
        }
    }

    #[test]
    fn test_severity_criticality() {
        assert!(Severity::Contraindicated.is_critical());
        assert!(Severity::Major.is_critical());
        assert!(!Severity::Moderate.is_critical());
        assert!(!Severity::Minor.is_critical());
    }

    #[test]
    fn test_tender_result_defaults_walk_in() {
        let result = TenderResult::new("   ", PaymentMethod::Card, None);
        assert_eq!(result.customer_name(), WALK_IN_CUSTOMER);

        let result = TenderResult::new(" Ada Lovelace ", PaymentMethod::Card, None);
        assert_eq!(result.customer_name(), "Ada Lovelace");
    }

    #[test]
    fn test_tender_result_drops_amount_for_non_cash() {
        let result = TenderResult::new("", PaymentMethod::Insurance, Some(Money::from_cents(500)));
        assert_eq!(result.amount_received(), None);

        let result = TenderResult::new("", PaymentMethod::Cash, Some(Money::from_cents(500)));
        assert_eq!(result.amount_received(), Some(Money::from_cents(500)));
    }

    #[test]
    fn test_finding_deserializes_without_counseled() {
        let json = r#"{
            "id": "f1",
            "pair": "Warfarin + Aspirin",
            "severity": "major",
            "message": "Bleeding risk"
        }"#;
        let finding: InteractionFinding = serde_json::from_str(json).unwrap();
        assert_eq!(finding.severity, Severity::Major);
        assert!(!finding.counseled);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("pharmacist".parse::<Role>().unwrap(), Role::Pharmacist);
        assert!("janitor".parse::<Role>().is_err());
    }
}
