use serde::{Deserialize, Serialize};

/// Derived figures published to every display surface. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub qris_sum: f64,
    pub transfer_sum: f64,
    pub cash_sum: f64,
    pub expense_sum: f64,
    pub total_in: f64,
    /// Cash left after expenses, clamped at zero.
    pub net_cash: f64,
    pub revenue: f64,
}
