//! # State Module
//!
//! Runtime state for one register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Register                                                               │
//! │   ├── Arc<dyn Backend>        managed service (async, thread-safe)      │
//! │   ├── Arc<dyn Notifier>       toasts                                    │
//! │   ├── Arc<RegisterConfig>     read-only after startup                   │
//! │   └── RegisterState           Arc<Mutex<Session>>                       │
//! │                                  ├── cart                               │
//! │                                  ├── catalog view                       │
//! │                                  ├── tender workflow                    │
//! │                                  ├── safety panel                       │
//! │                                  └── held carts                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;

pub use session::{RegisterState, Session};
