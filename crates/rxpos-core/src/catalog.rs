//! # Product Catalog View
//!
//! Filters the loaded catalog and turns searches and scans into cart adds.
//!
//! ## Three Ways to Add
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  click a result ──► add(product_id)                                     │
//! │                                                                         │
//! │  press Enter ─────► accept()   first result of the current query       │
//! │                                                                         │
//! │  scanner ─────────► scan(code)                                          │
//! │                       ├── exact code match (case-insensitive) → add    │
//! │                       └── miss → search(code), add the top result      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every add also lands in the "recent" strip: most recent first, one entry
//! per product, six entries unless configured otherwise. The strip is a
//! cashier convenience and is not part of the sale.

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::Product;
use crate::{DEFAULT_SEARCH_LIMIT, RECENT_ADDS_LIMIT};

/// Searchable view over the catalog fetched from the backend.
#[derive(Debug, Clone)]
pub struct CatalogView {
    products: Vec<Product>,
    query: String,
    limit: usize,
    recent: Vec<Product>,
    recent_limit: usize,
}

impl Default for CatalogView {
    fn default() -> Self {
        CatalogView::new(Vec::new())
    }
}

impl CatalogView {
    pub fn new(products: Vec<Product>) -> Self {
        CatalogView {
            products,
            query: String::new(),
            limit: DEFAULT_SEARCH_LIMIT,
            recent: Vec::new(),
            recent_limit: RECENT_ADDS_LIMIT,
        }
    }

    /// Sets the maximum number of search results (at least 1).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Sets the length of the recent strip (at least 1).
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.max(1);
        self
    }

    /// Replaces the catalog after a refresh. The query and recent strip
    /// are kept.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Case-insensitive substring match over name, code and category.
    ///
    /// An empty query returns the first `limit` products in catalog order.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| needle.is_empty() || matches_query(p, &needle))
            .take(self.limit)
            .collect()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results for the current query.
    pub fn results(&self) -> Vec<&Product> {
        self.search(&self.query)
    }

    // =========================================================================
    // Adding to the Cart
    // =========================================================================

    /// Adds a catalog product to the cart by id.
    pub fn add(&mut self, product_id: &str, cart: &mut Cart) -> CoreResult<Product> {
        let product = self
            .find(product_id)
            .cloned()
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        self.add_product(product, cart)
    }

    /// Enter-to-add: adds the first result of the current query and clears
    /// the query.
    pub fn accept(&mut self, cart: &mut Cart) -> CoreResult<Product> {
        let first = self
            .results()
            .first()
            .map(|p| (*p).clone())
            .ok_or_else(|| CoreError::NoMatch(self.query.trim().to_string()))?;
        let added = self.add_product(first, cart)?;
        self.query.clear();
        Ok(added)
    }

    /// Scanner input: exact code match, falling back to the top search hit.
    pub fn scan(&mut self, code: &str, cart: &mut Cart) -> CoreResult<Product> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CoreError::NoMatch(String::new()));
        }

        let exact = self
            .products
            .iter()
            .find(|p| {
                p.code
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(code))
            })
            .cloned();

        let product = match exact {
            Some(product) => product,
            None => self
                .search(code)
                .first()
                .map(|p| (*p).clone())
                .ok_or_else(|| CoreError::NoMatch(code.to_string()))?,
        };

        self.add_product(product, cart)
    }

    /// Recently added products, most recent first.
    pub fn recent(&self) -> &[Product] {
        &self.recent
    }

    fn add_product(&mut self, product: Product, cart: &mut Cart) -> CoreResult<Product> {
        cart.add_or_increment(&product)?;
        self.remember(product.clone());
        Ok(product)
    }

    fn remember(&mut self, product: Product) {
        self.recent.retain(|p| p.id != product.id);
        self.recent.insert(0, product);
        self.recent.truncate(self.recent_limit);
    }
}

fn matches_query(product: &Product, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&product.name)
        || product.code.as_deref().is_some_and(contains)
        || product.category.as_deref().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn catalog() -> CatalogView {
        CatalogView::new(vec![
            Product::new("amox", "Amoxicillin 500mg", Money::from_cents(1250))
                .with_code("0093-3109")
                .with_category("Antibiotics"),
            Product::new("ibu", "Ibuprofen 200mg", Money::from_cents(699))
                .with_code("0904-5853")
                .with_category("Analgesics"),
            Product::new("war", "Warfarin 5mg", Money::from_cents(1599))
                .with_code("0056-0172")
                .with_category("Anticoagulants"),
            Product::new("asp", "Aspirin 81mg", Money::from_cents(450))
                .with_code("63868-0072")
                .with_category("Analgesics"),
        ])
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_search_matches_name_code_and_category() {
        let view = catalog();
        assert_eq!(ids(&view.search("IBUPROFEN")), vec!["ibu"]);
        assert_eq!(ids(&view.search("0056")), vec!["war"]);
        assert_eq!(ids(&view.search("analges")), vec!["ibu", "asp"]);
        assert!(view.search("insulin").is_empty());
    }

    #[test]
    fn test_empty_query_returns_first_n_in_order() {
        let view = catalog().with_limit(3);
        assert_eq!(ids(&view.search("   ")), vec!["amox", "ibu", "war"]);
    }

    #[test]
    fn test_search_respects_limit() {
        let view = catalog().with_limit(1);
        assert_eq!(view.search("a").len(), 1);
    }

    #[test]
    fn test_scan_exact_code() {
        let mut view = catalog();
        let mut cart = Cart::new();

        let added = view.scan("0904-5853", &mut cart).unwrap();
        assert_eq!(added.id, "ibu");
        assert_eq!(cart.item("ibu").unwrap().quantity, 1);
    }

    #[test]
    fn test_scan_falls_back_to_search() {
        let mut view = catalog();
        let mut cart = Cart::new();

        let added = view.scan("warfarin", &mut cart).unwrap();
        assert_eq!(added.id, "war");

        let err = view.scan("no-such-code", &mut cart).unwrap_err();
        assert!(matches!(err, CoreError::NoMatch(_)));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_accept_adds_first_result_and_clears_query() {
        let mut view = catalog();
        let mut cart = Cart::new();

        view.set_query("analgesics");
        let added = view.accept(&mut cart).unwrap();
        assert_eq!(added.id, "ibu");
        assert_eq!(view.query(), "");

        view.set_query("zzz");
        assert!(matches!(view.accept(&mut cart), Err(CoreError::NoMatch(_))));
    }

    #[test]
    fn test_add_unknown_product() {
        let mut view = catalog();
        let mut cart = Cart::new();
        assert!(matches!(
            view.add("nope", &mut cart),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_recent_is_deduplicated_and_capped() {
        let mut products = Vec::new();
        for i in 0..8 {
            products.push(Product::new(
                format!("p{}", i),
                format!("Item {}", i),
                Money::from_cents(100),
            ));
        }
        let mut view = CatalogView::new(products);
        let mut cart = Cart::new();

        for i in 0..8 {
            view.add(&format!("p{}", i), &mut cart).unwrap();
        }
        view.add("p3", &mut cart).unwrap();

        let recent: Vec<&str> = view.recent().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(recent, vec!["p3", "p7", "p6", "p5", "p4", "p2"]);
    }
}
