#![doc(test(attr(deny(warnings))))]

//! Warrior Ledger keeps the daily sales and expense sheet of the Warrior Second shoe
//! resale shop: per-channel sales rows, expenses, derived totals and reusable sales
//! templates, persisted as JSON slots on disk.

pub mod app;
pub mod cli;
pub mod errors;
pub mod utils;

pub use app::Workspace;
pub use errors::{AppError, AppResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Warrior Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
