/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Indonesian rupiah without minor units: `Rp 1.250.000`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RupiahFormatter;

impl CurrencyFormatter for RupiahFormatter {
    fn format_amount(&self, amount: f64) -> String {
        format_idr(amount)
    }
}

pub fn format_idr(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = amount.abs().round() as u64;
    let sign = if amount < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{sign}Rp {}", group_thousands(rounded, '.'))
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
