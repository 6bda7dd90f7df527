//! # Validation Module
//!
//! Input validation and parsing for values typed at the register.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register UI                                                   │
//! │  ├── Disables actions that cannot succeed                               │
//! │  └── Keeps raw text buffers (discount field, cash field)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register commands (Rust)                                      │
//! │  └── THIS MODULE: parse text, check business rules                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Managed backend                                               │
//! │  ├── Row-level constraints                                              │
//! │  └── Unique memberships                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rxpos_core::validation::{parse_amount, validate_quantity};
//!
//! // Cash field text → cents
//! assert_eq!(parse_amount("12.5").unwrap().cents(), 1250);
//!
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest organization name accepted.
pub const MAX_ORG_NAME_LEN: usize = 120;

/// Longest customer name printed on a receipt.
pub const MAX_CUSTOMER_NAME_LEN: usize = 80;

// =============================================================================
// Money Input
// =============================================================================

/// Parses a typed amount ("12", "12.5", "12.50") into [`Money`].
///
/// ## Rules
/// - Must not be empty
/// - Digits with at most one decimal point
/// - At most two fraction digits
/// - Must not be negative
/// - Must not exceed MAX_AMOUNT_CENTS (1,000,000.00)
///
/// ```rust
/// use rxpos_core::validation::parse_amount;
///
/// assert_eq!(parse_amount(" 40 ").unwrap().cents(), 4000);
/// assert_eq!(parse_amount("0.05").unwrap().cents(), 5);
/// assert!(parse_amount("").is_err());
/// assert!(parse_amount("-1").is_err());
/// assert!(parse_amount("1.234").is_err());
/// ```
pub fn parse_amount(input: &str) -> ValidationResult<Money> {
    let text = input.trim();
    let field = "amount";

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if text.starts_with('-') {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("must be a number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("must be a number"));
    }
    if fraction.len() > 2 {
        return Err(invalid("at most two decimal places"));
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("too large"))?
    };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("must be a number"))?,
    };

    let amount = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents))
        .map(Money::from_cents)
        .ok_or_else(|| invalid("too large"))?;

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(invalid(&format!(
            "must not exceed {}",
            Money::from_cents(MAX_AMOUNT_CENTS).to_decimal_string()
        )));
    }
    Ok(amount)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns the first page of the catalog)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an organization name and returns it trimmed.
pub fn validate_org_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "organization name".to_string(),
        });
    }
    if name.chars().count() > MAX_ORG_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "organization name".to_string(),
            max: MAX_ORG_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a member email and returns it trimmed and lowercased.
///
/// Only the shape is checked (one `@`, non-empty local part, dotted
/// domain); the backend sends the invitation.
///
/// ```rust
/// use rxpos_core::validation::validate_email;
///
/// assert_eq!(validate_email(" RPh@Example.com ").unwrap(), "rph@example.com");
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(email.to_lowercase())
}

/// Validates the customer name on the tender form.
///
/// Blank is fine (the receipt says "Walk-in Customer").
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string (organization ids, held cart ids).
///
/// ```rust
/// use rxpos_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
