//! # Error Types
//!
//! Domain-specific error types for rxpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rxpos-core errors (this file)                                          │
//! │  ├── CoreError        - Cart/tender/safety rule violations              │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  rxpos-register errors (separate crate)                                 │
//! │  ├── BackendError     - Managed backend failures                        │
//! │  ├── ConfigError      - Configuration loading                           │
//! │  └── ApiError         - What the UI sees (kind + message)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Notifier                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal: every error either stops an action before any
//! state changes or can be retried.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this identifier in the cart.
    #[error("Item not in cart: {0}")]
    LineNotFound(String),

    /// No product with this identifier in the loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A scan or Enter-to-add found nothing to add.
    #[error("No product matches '{0}'")]
    NoMatch(String),

    /// Cart has reached its line limit.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity would exceed the per-line limit.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The action needs at least one line in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Held cart id is unknown (never held, already resumed or deleted).
    #[error("Held cart not found: {0}")]
    HeldCartNotFound(String),

    /// Interaction finding id is unknown.
    #[error("Interaction finding not found: {0}")]
    FindingNotFound(String),

    /// Completion was requested while the tender cannot complete.
    ///
    /// ## When This Occurs
    /// ```text
    /// complete()
    ///    │
    ///    ├── total is zero ─────────────► "nothing to charge"
    ///    ├── no method selected ────────► "select a payment method"
    ///    ├── cash below total ──────────► "amount received is below the total"
    ///    ├── safety gate engaged ───────► "checkout is blocked by unresolved interactions"
    ///    └── submission in flight ──────► "a sale is already being submitted"
    /// ```
    #[error("Cannot complete tender: {reason}")]
    TenderBlocked { reason: String },

    /// An amount was entered for a method that does not take one.
    #[error("{method} does not take an amount received")]
    AmountNotApplicable { method: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a TenderBlocked error.
    pub fn tender_blocked(reason: impl Into<String>) -> Self {
        CoreError::TenderBlocked {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs; the UI disables the action or shows
/// the message inline.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (non-numeric amount, malformed email, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
