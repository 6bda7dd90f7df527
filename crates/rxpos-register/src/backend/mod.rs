//! # Backend Seam
//!
//! The managed backend (auth, tables, RPC) as the register sees it.
//!
//! ## Calls
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Register                          Backend                              │
//! │  ────────                          ───────                              │
//! │  refresh_catalog ───────────────►  fetch_catalog()                      │
//! │  refresh_interactions ──────────►  fetch_interactions(product_ids)      │
//! │  complete_sale ─────────────────►  record_sale(SaleSubmission) → SaleId │
//! │  list_organizations ────────────►  list_organizations()                 │
//! │  create_organization ───────────►  create_organization(fields)          │
//! │  add_member ────────────────────►  add_member(org, email, role)         │
//! │                                                                         │
//! │  One request, one response. No retries at this layer; every call is    │
//! │  bounded by the configured request timeout.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Idempotent Sales
//! Every [`SaleSubmission`] carries a client-generated `sale_id`. A backend
//! that has already recorded that id must answer with the original SaleId
//! instead of recording the sale twice.

mod memory;

pub use memory::InMemoryBackend;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rxpos_core::{
    CartTotals, InteractionFinding, LineItem, Membership, NewOrganization, Organization, Product,
    Role, SafetyOverride, TenderResult,
};

/// Result type alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Failure reported by (or while reaching) the backend.
///
/// Messages from the service are kept verbatim; they end up in front of
/// the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service answered with an error.
    #[error("{0}")]
    Remote(String),

    /// No answer within the request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint hit (duplicate member, duplicate organization).
    #[error("{0}")]
    Conflict(String),

    /// The service refused the input.
    #[error("{0}")]
    Rejected(String),
}

/// A completed sale as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSubmission {
    /// Client-generated UUID; the idempotency key.
    pub sale_id: String,
    pub tender: TenderResult,
    pub lines: Vec<LineItem>,
    pub totals: CartTotals,
    /// Present when a pharmacist let critical interactions through.
    pub safety_override: Option<SafetyOverride>,
    pub submitted_at: DateTime<Utc>,
}

impl SaleSubmission {
    /// JSON body for the backend's `record_sale` RPC.
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The managed backend.
///
/// Implemented over the service's generated client in the application and
/// by [`InMemoryBackend`] for tests and offline demos.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_organizations(&self) -> BackendResult<Vec<Organization>>;

    async fn create_organization(&self, fields: NewOrganization) -> BackendResult<Organization>;

    async fn add_member(&self, org_id: &str, email: &str, role: Role)
        -> BackendResult<Membership>;

    /// Records a sale and returns the backend's SaleId.
    async fn record_sale(&self, sale: &SaleSubmission) -> BackendResult<String>;

    async fn fetch_catalog(&self) -> BackendResult<Vec<Product>>;

    /// Interaction findings among the given products.
    async fn fetch_interactions(
        &self,
        product_ids: &[String],
    ) -> BackendResult<Vec<InteractionFinding>>;
}
