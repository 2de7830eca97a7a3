//! ws-core
//!
//! Ledger store, aggregation and template registry for the Warrior Second ledger.
//! Depends on ws-domain. No CLI, no terminal I/O; persistence goes through the
//! [`storage::KeyValueStore`] port.

pub mod aggregator;
pub mod chart;
pub mod error;
pub mod export;
pub mod format;
pub mod ids;
pub mod ledger_store;
pub mod storage;
pub mod template_registry;


pub use aggregator::Aggregator;
pub use chart::ChartSeries;
pub use error::{CoreError, CoreResult};
pub use format::{format_idr, CurrencyFormatter, RupiahFormatter};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use ledger_store::{LedgerSlots, LedgerStore};
pub use storage::{KeyValueStore, MemoryStore};
pub use template_registry::{TemplateRegistry, TemplateSlots};
