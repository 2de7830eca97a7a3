//! ws-config
//!
//! User preferences for the ledger tools: locale, currency, data location and the storage
//! slot names, plus their persistence on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, StorageKeys};
