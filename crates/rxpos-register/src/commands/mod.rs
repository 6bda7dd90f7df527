//! # Register Commands
//!
//! The operations the register UI invokes. Each submodule adds one group
//! of methods to [`Register`].
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Register Commands                                    │
//! │                                                                         │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐               │
//! │  │  catalog.rs   │  │   cart.rs     │  │  safety.rs    │               │
//! │  │               │  │               │  │               │               │
//! │  │ refresh_      │  │ add_product   │  │ refresh_      │               │
//! │  │   catalog     │  │ scan          │  │   interactions│               │
//! │  │ search        │  │ accept_search │  │ toggle_       │               │
//! │  │ recent        │  │ increment     │  │   counseled   │               │
//! │  │               │  │ decrement     │  │ override_     │               │
//! │  │               │  │ remove        │  │   safety      │               │
//! │  │               │  │ set_discount  │  │               │               │
//! │  │               │  │ clear_cart    │  │               │               │
//! │  └───────────────┘  └───────────────┘  └───────────────┘               │
//! │                                                                         │
//! │  ┌───────────────┐  ┌───────────────┐  ┌───────────────┐               │
//! │  │  tender.rs    │  │   sale.rs     │  │   held.rs     │               │
//! │  │               │  │               │  │               │               │
//! │  │ set_customer_ │  │ complete_sale │  │ hold_cart     │               │
//! │  │   name        │  │ receipt_text  │  │ resume_cart   │               │
//! │  │ select_       │  │               │  │ delete_held_  │               │
//! │  │   payment_    │  │               │  │   cart        │               │
//! │  │   method      │  │               │  │ list_held_    │               │
//! │  │ set_amount_   │  │               │  │   carts       │               │
//! │  │   received    │  │               │  │               │               │
//! │  │ exact_amount  │  │               │  │               │               │
//! │  │ add_quick_    │  │               │  │               │               │
//! │  │   amount      │  │               │  │               │               │
//! │  └───────────────┘  └───────────────┘  └───────────────┘               │
//! │                                                                         │
//! │  ┌───────────────┐                                                      │
//! │  │   admin.rs    │  list_organizations, create_organization,           │
//! │  │               │  add_member                                          │
//! │  └───────────────┘                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backend Failures
//! Every backend call goes through [`Register::remote`]: bounded by the
//! configured timeout, logged, and reported to the [`Notifier`] with the
//! service's message. Local state is only changed after a call succeeds.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod held;
pub mod safety;
pub mod sale;
pub mod tender;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use rxpos_core::{CatalogView, Product};

use crate::backend::{Backend, BackendError, BackendResult};
use crate::config::RegisterConfig;
use crate::error::{ApiError, ApiResult};
use crate::notify::{Notifier, TracingNotifier};
use crate::state::{RegisterState, Session};

pub use cart::{CartLineView, CartResponse};
pub use held::{HeldCartSummary, HeldCartsResponse};
pub use safety::{FindingView, SafetyResponse};
pub use tender::TenderResponse;

/// One register: session state wired to a backend and a notifier.
pub struct Register {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    config: Arc<RegisterConfig>,
    state: RegisterState,
}

/// Everything the register screen shows, in one read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterView {
    pub cart: CartResponse,
    pub tender: TenderResponse,
    pub safety: SafetyResponse,
    pub held: HeldCartsResponse,
    pub recent: Vec<Product>,
}

impl Register {
    /// Creates a register that reports notifications to the log.
    pub fn new(config: RegisterConfig, backend: Arc<dyn Backend>) -> Self {
        let catalog = CatalogView::default()
            .with_limit(config.register.search_limit)
            .with_recent_limit(config.register.recent_limit);

        Register {
            backend,
            notifier: Arc::new(TracingNotifier),
            config: Arc::new(config),
            state: RegisterState::new(Session::new(catalog)),
        }
    }

    /// Replaces the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    pub fn state(&self) -> &RegisterState {
        &self.state
    }

    /// Snapshot of the whole register screen.
    pub fn view(&self) -> RegisterView {
        RegisterView {
            cart: self.get_cart(),
            tender: self.get_tender(),
            safety: self.get_safety(),
            held: self.list_held_carts(),
            recent: self.recent(),
        }
    }

    /// Runs one backend call with the request timeout and reports failures.
    async fn remote<T, F>(&self, operation: &'static str, call: F) -> ApiResult<T>
    where
        F: Future<Output = BackendResult<T>>,
    {
        let outcome = match tokio::time::timeout(self.config.request_timeout(), call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout(self.config.backend.request_timeout_secs)),
        };

        outcome.map_err(|e| {
            error!(operation, error = %e, "Backend call failed");
            self.notifier.notify_error(&e.to_string());
            ApiError::from(e)
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::notify::MemoryNotifier;

    pub(crate) struct Harness {
        pub register: Register,
        pub backend: Arc<InMemoryBackend>,
        pub notifier: Arc<MemoryNotifier>,
    }

    /// A register over the seeded in-memory backend with the catalog loaded.
    pub(crate) async fn harness() -> Harness {
        let backend = Arc::new(InMemoryBackend::seeded());
        let notifier = Arc::new(MemoryNotifier::new());
        let register = Register::new(RegisterConfig::default(), backend.clone())
            .with_notifier(notifier.clone());
        register.refresh_catalog().await.unwrap();
        Harness {
            register,
            backend,
            notifier,
        }
    }
}
