//! Comprar: end-to-end UI/API test harness for the AutomationExercise
//! storefront.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    COMPRAR Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌──────────────────┐      │
//! │   │ Scenario   │───►│ Page       │───►│ Waiter (poll)    │      │
//! │   │ (test)     │    │ Objects    │    │ └► PageDriver    │      │
//! │   └─────┬──────┘    └────────────┘    │    ├► SimDriver  │      │
//! │         │                             │    └► CdpDriver  │      │
//! │         │           ┌────────────┐    └──────────────────┘      │
//! │         └──────────►│ Request    │───► storefront REST API      │
//! │                     │ builder    │                              │
//! │                     └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every interaction is wait-then-act: page objects compose the explicit
//! waits in [`wait`], which poll one of two interchangeable
//! [`driver::PageDriver`] backends selected at startup. API checks go
//! through the fluent [`api::Request`] builder; cart invariants live in
//! [`checks`] as pure functions over parsed snapshots.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod api;
pub mod checks;
pub mod components;
pub mod config;
pub mod driver;
pub mod flows;
pub mod locator;
pub mod pages;
pub mod parse;
pub mod result;
pub mod session;
pub mod sim;
pub mod wait;

#[cfg(feature = "browser")]
pub mod cdp;

pub use api::{ApiResponse, Method, Request, User};
pub use checks::{CartSnapshot, ProductInfo};
pub use config::{Backend, Config};
pub use driver::{ElementHandle, PageDriver};
pub use locator::{Locator, Strategy};
pub use result::{ComprarError, ComprarResult};
pub use session::Session;
pub use sim::{SimDriver, SimHandle};
pub use wait::{WaitOptions, Waiter};

/// Install a tracing subscriber honoring `RUST_LOG`.
///
/// Opt-in, for test binaries; repeated calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
