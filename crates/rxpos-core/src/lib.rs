//! # rxpos-core: Pure Business Logic for RxPOS
//!
//! This crate is the **heart** of the pharmacy register. It contains the
//! cart, tender, safety and receipt logic as plain data and pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          RxPOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         Register UI                             │   │
//! │  │   Search ──► Cart ──► Safety Panel ──► Tender ──► Receipt       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 rxpos-register (session layer)                  │   │
//! │  │   refresh_catalog, add_product, complete_sale, hold_cart ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rxpos-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  cart   │ │ catalog │ │ tender  │ │ safety  │ │  held   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐              │   │
//! │  │   │  money  │ │currency │ │ receipt │ │validation│             │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO BACKEND • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PaymentMethod, InteractionFinding, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`currency`] - Display formatting driven by the store's currency settings
//! - [`cart`] - Line items, discount and derived totals
//! - [`catalog`] - Product search, scan-to-add, recent adds
//! - [`tender`] - Payment capture state machine
//! - [`safety`] - Drug-interaction acknowledgement and checkout gate
//! - [`held`] - Suspended carts
//! - [`receipt`] - Printable sale summary
//! - [`validation`] - Input validation and money parsing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rxpos_core::cart::Cart;
//! use rxpos_core::money::Money;
//! use rxpos_core::types::Product;
//!
//! let amoxicillin = Product::new("p-1", "Amoxicillin 500mg", Money::from_cents(1250));
//!
//! let mut cart = Cart::new();
//! cart.add_or_increment(&amoxicillin).unwrap();
//! cart.add_or_increment(&amoxicillin).unwrap();
//!
//! assert_eq!(cart.subtotal().cents(), 2500);
//! assert_eq!(cart.tax().cents(), 200); // 8% of $25.00
//! assert_eq!(cart.total().cents(), 2700);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod currency;
pub mod error;
pub mod held;
pub mod money;
pub mod receipt;
pub mod safety;
pub mod tender;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals, LineItem};
pub use catalog::CatalogView;
pub use currency::{CurrencyConfig, SymbolPosition};
pub use error::{CoreError, CoreResult, ValidationError};
pub use held::{HeldCart, HeldCartRegistry};
pub use money::Money;
pub use receipt::{Receipt, ReceiptLine};
pub use safety::{SafetyOverride, SafetyPanel, Urgency};
pub use tender::{TenderState, TenderWorkflow};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every cart, in basis points (800 = 8%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest amount accepted from a money text field (1,000,000.00).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000;

/// Number of catalog matches shown for a search.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Length of the "recently added" strip.
pub const RECENT_ADDS_LIMIT: usize = 6;

/// Customer name used when the cashier leaves the field blank.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Currency used when the configured code cannot be formatted.
pub const DEFAULT_CURRENCY_CODE: &str = "USD";
