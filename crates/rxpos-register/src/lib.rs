//! # rxpos-register: Register Session Layer
//!
//! Wires the pure `rxpos-core` logic to a managed backend and to the
//! register UI.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         rxpos-register                                  │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │                       Register (commands/)                        │ │
//! │  │  cart · catalog · safety · tender · sale · held · admin           │ │
//! │  └──────────┬───────────────────────┬────────────────────┬──────────┘ │
//! │             │                       │                    │            │
//! │             ▼                       ▼                    ▼            │
//! │  ┌──────────────────┐    ┌──────────────────┐   ┌──────────────────┐ │
//! │  │ RegisterState    │    │ dyn Backend      │   │ dyn Notifier     │ │
//! │  │ (state/)         │    │ (backend/)       │   │ (notify.rs)      │ │
//! │  │ Mutex<Session>   │    │ InMemoryBackend  │   │ TracingNotifier  │ │
//! │  └──────────────────┘    └──────────────────┘   └──────────────────┘ │
//! │                                                                         │
//! │  config.rs     register.toml + RXPOS_* overrides                        │
//! │  telemetry.rs  tracing subscriber                                       │
//! │  error.rs      ApiError { kind, message }                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rxpos_register::{InMemoryBackend, Register, RegisterConfig};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let register = Register::new(RegisterConfig::default(), Arc::new(InMemoryBackend::seeded()));
//! register.refresh_catalog().await.unwrap();
//! let cart = register.add_product("amox-500").await.unwrap();
//! assert_eq!(cart.totals.total_cents, 1350);
//! # });
//! ```

pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod state;
pub mod telemetry;

pub use backend::{Backend, BackendError, BackendResult, InMemoryBackend, SaleSubmission};
pub use commands::{
    CartLineView, CartResponse, FindingView, HeldCartSummary, HeldCartsResponse, Register,
    RegisterView, SafetyResponse, TenderResponse,
};
pub use config::RegisterConfig;
pub use error::{ApiError, ApiResult, ConfigError, ErrorKind};
pub use notify::{MemoryNotifier, Notification, Notifier, TracingNotifier};
pub use telemetry::init_tracing;
