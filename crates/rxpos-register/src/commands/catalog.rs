//! # Catalog Commands
//!
//! Loading the product catalog and searching it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Search Box                                                             │
//! │                                                                         │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  🔍 amox                                                       │    │
//! │  ├────────────────────────────────────────────────────────────────┤    │
//! │  │  Amoxicillin 500mg      0093-3109        $12.50   ◄── Enter    │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  Recent: [Ibuprofen 200mg] [Aspirin 81mg]                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use rxpos_core::validation::validate_search_query;
use rxpos_core::Product;

use super::Register;
use crate::error::ApiResult;

impl Register {
    /// Replaces the local catalog with the backend's. The cart keeps its
    /// frozen prices.
    pub async fn refresh_catalog(&self) -> ApiResult<usize> {
        debug!("refresh_catalog command");

        let products = self
            .remote("fetch_catalog", self.backend.fetch_catalog())
            .await?;
        let count = products.len();

        self.state
            .with_session_mut(|s| s.catalog.set_products(products));

        info!(count, "Catalog loaded");
        Ok(count)
    }

    /// Sets the search query and returns its matches.
    pub fn search(&self, query: &str) -> ApiResult<Vec<Product>> {
        debug!(query = %query, "search command");

        let query = validate_search_query(query)?;
        Ok(self.state.with_session_mut(|s| {
            s.catalog.set_query(query);
            s.catalog.results().into_iter().cloned().collect()
        }))
    }

    /// Recently added products, most recent first.
    pub fn recent(&self) -> Vec<Product> {
        self.state.with_session(|s| s.catalog.recent().to_vec())
    }
}
