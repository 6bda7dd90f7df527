//! # Error Types
//!
//! What register commands return to the UI, plus configuration errors.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in RxPOS                                  │
//! │                                                                         │
//! │  UI                          Register                                   │
//! │  ──                          ────────                                   │
//! │                                                                         │
//! │  register.complete_sale()                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command                                                         │  │
//! │  │  ApiResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Backend failed? ─── BackendError ──► Notifier + ApiError ──────►│  │
//! │  │         │                             (RemoteFailure)            │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule violated? ──── CoreError ─────► ApiError ─────────────────►│  │
//! │  │         │                             (Validation / NotFound)    │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"kind": "REMOTE_FAILURE", "message": "permission denied for ..."}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal. A failed command leaves the cart and tender form
//! as they were so the cashier can retry.

use serde::Serialize;
use thiserror::Error;

use rxpos_core::CoreError;

use crate::backend::BackendError;

/// Error returned from register commands.
///
/// ```json
/// {
///   "kind": "NOT_FOUND",
///   "message": "Held cart not found: 5f0c..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable category
    pub kind: ErrorKind,

    /// Human-readable message, shown as-is
    pub message: String,
}

/// Closed set of error categories the UI reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad input or an action that is currently disabled
    Validation,

    /// The backend failed or did not answer in time
    RemoteFailure,

    /// The action clashes with current state (sale in flight, cart not empty,
    /// duplicate member)
    Conflict,

    /// Unknown product, line, held cart or finding
    NotFound,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Validation, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Conflict, message)
    }

    pub fn remote(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::RemoteFailure, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let kind = match &err {
            CoreError::LineNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::NoMatch(_)
            | CoreError::HeldCartNotFound(_)
            | CoreError::FindingNotFound(_) => ErrorKind::NotFound,
            CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::EmptyCart
            | CoreError::TenderBlocked { .. }
            | CoreError::AmountNotApplicable { .. }
            | CoreError::Validation(_) => ErrorKind::Validation,
        };
        ApiError::new(kind, err.to_string())
    }
}

impl From<rxpos_core::ValidationError> for ApiError {
    fn from(err: rxpos_core::ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Backend messages pass through verbatim.
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        let kind = match &err {
            BackendError::Remote(_) | BackendError::Timeout(_) => ErrorKind::RemoteFailure,
            BackendError::NotFound { .. } => ErrorKind::NotFound,
            BackendError::Conflict(_) => ErrorKind::Conflict,
            BackendError::Rejected(_) => ErrorKind::Validation,
        };
        ApiError::new(kind, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for register commands.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors loading, validating or saving `register.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has an unusable value.
    #[error("Invalid register configuration: {0}")]
    Invalid(String),

    /// Backend URL does not parse or is not http(s).
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// No platform config directory and no explicit path.
    #[error("No config path available")]
    NoConfigPath,

    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rxpos_core::ValidationError;

    #[test]
    fn test_core_error_kinds() {
        let err: ApiError = CoreError::HeldCartNotFound("h-1".to_string()).into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Held cart not found: h-1");

        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "email".to_string(),
        })
        .into();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_backend_message_is_verbatim() {
        let err: ApiError =
            BackendError::Remote("permission denied for table sales".to_string()).into();
        assert_eq!(err.kind, ErrorKind::RemoteFailure);
        assert_eq!(err.message, "permission denied for table sales");

        let err: ApiError = BackendError::Conflict("already a member".to_string()).into();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_serializes_kind_in_screaming_case() {
        let json = serde_json::to_string(&ApiError::remote("offline")).unwrap();
        assert_eq!(json, r#"{"kind":"REMOTE_FAILURE","message":"offline"}"#);
    }
}
