//! # In-Memory Backend
//!
//! A [`Backend`] that keeps everything in process. Used by the tests and for
//! running the register without a network.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MemoryStore (behind tokio RwLock)                                      │
//! │                                                                         │
//! │  catalog        Vec<Product>                                            │
//! │  rules          unordered product pair → severity + message             │
//! │  organizations  + members (email unique per organization)               │
//! │  sales          keyed by client sale id (resubmits return the same id)  │
//! │  failure        Some(msg) → every call fails with Remote(msg)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use rxpos_core::{
    InteractionFinding, Membership, Money, NewOrganization, Organization, Product, Role, Severity,
};

use super::{Backend, BackendError, BackendResult, SaleSubmission};

#[derive(Debug, Clone)]
struct InteractionRule {
    first: String,
    second: String,
    severity: Severity,
    message: String,
}

impl InteractionRule {
    fn matches(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

#[derive(Debug, Clone)]
struct RecordedSale {
    sale_number: String,
    submission: SaleSubmission,
}

#[derive(Debug, Default)]
struct MemoryStore {
    catalog: Vec<Product>,
    rules: Vec<InteractionRule>,
    organizations: Vec<Organization>,
    members: Vec<Membership>,
    sales: Vec<RecordedSale>,
    failure: Option<String>,
}

impl MemoryStore {
    fn check(&self) -> BackendResult<()> {
        match &self.failure {
            Some(message) => Err(BackendError::Remote(message.clone())),
            None => Ok(()),
        }
    }

    fn product_name(&self, id: &str) -> String {
        self.catalog
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// In-process backend.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: RwLock<MemoryStore>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        InMemoryBackend::default()
    }

    /// Small pharmacy catalog with one contraindicated, one major and one
    /// minor interaction.
    pub fn seeded() -> Self {
        InMemoryBackend::new()
            .with_products(vec![
                Product::new("amox-500", "Amoxicillin 500mg", Money::from_cents(1250))
                    .with_code("0093-3109")
                    .with_category("Antibiotics"),
                Product::new("ibu-200", "Ibuprofen 200mg", Money::from_cents(699))
                    .with_code("0904-5853")
                    .with_category("Analgesics"),
                Product::new("asa-81", "Aspirin 81mg", Money::from_cents(450))
                    .with_code("63868-0072")
                    .with_category("Analgesics"),
                Product::new("warf-5", "Warfarin 5mg", Money::from_cents(1599))
                    .with_code("0056-0172")
                    .with_category("Anticoagulants"),
                Product::new("simva-20", "Simvastatin 20mg", Money::from_cents(899))
                    .with_code("0093-7153")
                    .with_category("Statins"),
                Product::new("clari-500", "Clarithromycin 500mg", Money::from_cents(2199))
                    .with_code("0093-7158")
                    .with_category("Antibiotics"),
                Product::new("antacid", "Calcium Carbonate Antacid", Money::from_cents(349))
                    .with_code("0536-1083")
                    .with_category("Digestive"),
            ])
            .with_interaction(
                "warf-5",
                "asa-81",
                Severity::Contraindicated,
                "Combined anticoagulant and antiplatelet effect: high bleeding risk",
            )
            .with_interaction(
                "simva-20",
                "clari-500",
                Severity::Major,
                "Clarithromycin raises simvastatin levels: risk of myopathy",
            )
            .with_interaction(
                "ibu-200",
                "antacid",
                Severity::Minor,
                "Antacid may delay ibuprofen absorption; space doses",
            )
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.store.get_mut().catalog = products;
        self
    }

    /// Adds an interaction rule; the pair is unordered.
    pub fn with_interaction(
        mut self,
        first: &str,
        second: &str,
        severity: Severity,
        message: &str,
    ) -> Self {
        self.store.get_mut().rules.push(InteractionRule {
            first: first.to_string(),
            second: second.to_string(),
            severity,
            message: message.to_string(),
        });
        self
    }

    /// Makes every call fail with `message` until [`recover`](Self::recover).
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.store.write().await.failure = Some(message.into());
    }

    pub async fn recover(&self) {
        self.store.write().await.failure = None;
    }

    /// Sales recorded so far, oldest first.
    pub async fn recorded_sales(&self) -> Vec<SaleSubmission> {
        self.store
            .read()
            .await
            .sales
            .iter()
            .map(|s| s.submission.clone())
            .collect()
    }

    pub async fn members(&self, org_id: &str) -> Vec<Membership> {
        self.store
            .read()
            .await
            .members
            .iter()
            .filter(|m| m.organization_id == org_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_organizations(&self) -> BackendResult<Vec<Organization>> {
        let store = self.store.read().await;
        store.check()?;
        Ok(store.organizations.clone())
    }

    async fn create_organization(&self, fields: NewOrganization) -> BackendResult<Organization> {
        let mut store = self.store.write().await;
        store.check()?;

        if store
            .organizations
            .iter()
            .any(|o| o.name.eq_ignore_ascii_case(&fields.name))
        {
            return Err(BackendError::Conflict(format!(
                "Organization '{}' already exists",
                fields.name
            )));
        }

        let organization = Organization {
            id: Uuid::new_v4().to_string(),
            name: fields.name,
            created_at: Utc::now(),
        };
        store.organizations.push(organization.clone());
        Ok(organization)
    }

    async fn add_member(
        &self,
        org_id: &str,
        email: &str,
        role: Role,
    ) -> BackendResult<Membership> {
        let mut store = self.store.write().await;
        store.check()?;

        if !store.organizations.iter().any(|o| o.id == org_id) {
            return Err(BackendError::NotFound {
                entity: "Organization".to_string(),
                id: org_id.to_string(),
            });
        }
        if store
            .members
            .iter()
            .any(|m| m.organization_id == org_id && m.email.eq_ignore_ascii_case(email))
        {
            return Err(BackendError::Conflict(format!(
                "{} is already a member",
                email
            )));
        }

        let membership = Membership {
            organization_id: org_id.to_string(),
            email: email.to_string(),
            role,
        };
        store.members.push(membership.clone());
        Ok(membership)
    }

    async fn record_sale(&self, sale: &SaleSubmission) -> BackendResult<String> {
        let mut store = self.store.write().await;
        store.check()?;

        if let Some(existing) = store
            .sales
            .iter()
            .find(|s| s.submission.sale_id == sale.sale_id)
        {
            debug!(sale_id = %sale.sale_id, "Duplicate sale submission");
            return Ok(existing.sale_number.clone());
        }

        // Keep what would have crossed the wire, not the caller's struct.
        let payload = sale
            .to_payload()
            .map_err(|e| BackendError::Rejected(e.to_string()))?;
        let submission: SaleSubmission =
            serde_json::from_str(&payload).map_err(|e| BackendError::Rejected(e.to_string()))?;

        let sale_number = format!("S-{:06}", store.sales.len() + 1);
        debug!(sale_id = %submission.sale_id, bytes = payload.len(), "Sale recorded");
        store.sales.push(RecordedSale {
            sale_number: sale_number.clone(),
            submission,
        });
        Ok(sale_number)
    }

    async fn fetch_catalog(&self) -> BackendResult<Vec<Product>> {
        let store = self.store.read().await;
        store.check()?;
        Ok(store.catalog.clone())
    }

    async fn fetch_interactions(
        &self,
        product_ids: &[String],
    ) -> BackendResult<Vec<InteractionFinding>> {
        let store = self.store.read().await;
        store.check()?;

        let mut findings = Vec::new();
        for (i, a) in product_ids.iter().enumerate() {
            for b in &product_ids[i + 1..] {
                for rule in store.rules.iter().filter(|r| r.matches(a, b)) {
                    findings.push(InteractionFinding::new(
                        format!("{}:{}", rule.first, rule.second),
                        format!("{} + {}", store.product_name(a), store.product_name(b)),
                        rule.severity,
                        rule.message.clone(),
                    ));
                }
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxpos_core::{Cart, PaymentMethod, TenderResult};

    fn submission(sale_id: &str) -> SaleSubmission {
        let cart = Cart::new();
        SaleSubmission {
            sale_id: sale_id.to_string(),
            tender: TenderResult::new("", PaymentMethod::Card, None),
            lines: cart.items().to_vec(),
            totals: cart.totals(),
            safety_override: None,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_interactions_match_unordered_pairs() {
        let backend = InMemoryBackend::seeded();
        let ids = vec!["asa-81".to_string(), "amox-500".to_string(), "warf-5".to_string()];

        let findings = backend.fetch_interactions(&ids).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Contraindicated);
        assert_eq!(findings[0].pair, "Aspirin 81mg + Warfarin 5mg");
        assert!(!findings[0].counseled);
    }

    #[tokio::test]
    async fn test_record_sale_is_idempotent() {
        let backend = InMemoryBackend::new();
        let first = backend.record_sale(&submission("a")).await.unwrap();
        let again = backend.record_sale(&submission("a")).await.unwrap();
        let other = backend.record_sale(&submission("b")).await.unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(backend.recorded_sales().await.len(), 2);
    }

    #[tokio::test]
    async fn test_recorded_sale_matches_submission() {
        let backend = InMemoryBackend::new();
        let sale = submission("a");
        backend.record_sale(&sale).await.unwrap();

        assert_eq!(backend.recorded_sales().await, vec![sale]);
    }

    #[tokio::test]
    async fn test_duplicate_member_is_conflict() {
        let backend = InMemoryBackend::new();
        let org = backend
            .create_organization(NewOrganization {
                name: "Corner Pharmacy".to_string(),
            })
            .await
            .unwrap();

        backend
            .add_member(&org.id, "rph@example.com", Role::Pharmacist)
            .await
            .unwrap();
        let err = backend
            .add_member(&org.id, "RPH@example.com", Role::Cashier)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Conflict(_)));

        let err = backend
            .add_member("missing", "a@example.com", Role::Cashier)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let backend = InMemoryBackend::seeded();
        backend.fail_with("service unavailable").await;
        assert_eq!(
            backend.fetch_catalog().await.unwrap_err(),
            BackendError::Remote("service unavailable".to_string())
        );

        backend.recover().await;
        assert_eq!(backend.fetch_catalog().await.unwrap().len(), 7);
    }
}
