//! ws-domain
//!
//! Pure domain models for the Warrior Second ledger (sales rows, expense rows,
//! templates, totals). No I/O, no CLI, no storage. Only data types and coercion rules.

pub mod amount;
pub mod common;
pub mod expense;
pub mod sale;
pub mod template;
pub mod totals;

pub use common::*;
pub use expense::*;
pub use sale::*;
pub use template::*;
pub use totals::*;
