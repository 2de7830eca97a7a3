use ws_domain::{Channel, ExpenseRow, SalesRow, Totals};

/// Derives every displayed figure from the current row collections. Holds no state.
pub struct Aggregator;

impl Aggregator {
    pub fn compute_totals(sales: &[SalesRow], expenses: &[ExpenseRow]) -> Totals {
        let qris_sum = Self::channel_sum(sales, Channel::Qris);
        let transfer_sum = Self::channel_sum(sales, Channel::Transfer);
        let cash_sum = Self::channel_sum(sales, Channel::Cash);
        let expense_sum = Self::expense_sum(expenses);
        let total_in = qris_sum + transfer_sum + cash_sum;
        Totals {
            qris_sum,
            transfer_sum,
            cash_sum,
            expense_sum,
            total_in,
            net_cash: Self::compute_net_cash(cash_sum, expense_sum),
            revenue: total_in,
        }
    }

    /// Cash remaining after expenses. The only place the zero clamp is applied.
    pub fn compute_net_cash(cash_sum: f64, expense_sum: f64) -> f64 {
        (cash_sum - expense_sum).max(0.0)
    }

    pub fn channel_sum(sales: &[SalesRow], channel: Channel) -> f64 {
        stable_sum(sales.iter().map(|row| row.channel(channel)))
    }

    pub fn expense_sum(expenses: &[ExpenseRow]) -> f64 {
        stable_sum(expenses.iter().map(|row| row.amount))
    }
}

// Sorting first makes the result independent of row order.
fn stable_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
