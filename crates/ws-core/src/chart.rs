use serde::Serialize;
use ws_domain::{Channel, SalesRow};

const FALLBACK_LABEL: &str = "Item";
const LABEL_CHARS: usize = 8;

/// Per-row channel values feeding the grouped bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub qris: Vec<f64>,
    pub transfer: Vec<f64>,
    pub cash: Vec<f64>,
    /// Largest value across all channels, never below 1 so scaling cannot divide by zero.
    pub max_value: f64,
}

impl ChartSeries {
    pub fn from_rows(rows: &[SalesRow]) -> Self {
        let labels = rows
            .iter()
            .map(|row| {
                if row.name.trim().is_empty() {
                    FALLBACK_LABEL.to_string()
                } else {
                    row.name.clone()
                }
            })
            .collect();
        let series = |channel: Channel| -> Vec<f64> {
            rows.iter().map(|row| row.channel(channel)).collect()
        };
        let qris = series(Channel::Qris);
        let transfer = series(Channel::Transfer);
        let cash = series(Channel::Cash);
        let max_value = qris
            .iter()
            .chain(&transfer)
            .chain(&cash)
            .copied()
            .fold(1.0_f64, f64::max);
        Self {
            labels,
            qris,
            transfer,
            cash,
            max_value,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn values(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Qris => &self.qris,
            Channel::Transfer => &self.transfer,
            Channel::Cash => &self.cash,
        }
    }

    /// Bar height for `value` in a plot area `plot_height` tall.
    pub fn scale(&self, value: f64, plot_height: f64) -> f64 {
        (value / self.max_value) * plot_height
    }

    /// Axis labels at 0, 25, 50, 75 and 100 percent of the maximum.
    pub fn ticks(&self) -> [u64; 5] {
        [0.0, 0.25, 0.5, 0.75, 1.0].map(|t| (self.max_value * t).round() as u64)
    }
}

/// Truncates labels longer than eight characters, marking the cut with an ellipsis.
pub fn short_label(label: &str) -> String {
    if label.chars().count() > LABEL_CHARS {
        let mut short: String = label.chars().take(LABEL_CHARS).collect();
        short.push('…');
        short
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_domain::{LedgerRow, RowId, SalesPatch};

    #[test]
    fn empty_rows_keep_unit_maximum() {
        let series = ChartSeries::from_rows(&[]);
        assert!(series.is_empty());
        assert_eq!(series.max_value, 1.0);
        assert_eq!(series.ticks(), [0, 0, 1, 1, 1]);
    }

    #[test]
    fn blank_names_fall_back_and_max_spans_channels() {
        let rows = vec![
            SalesRow::from_patch(RowId::new("a"), &SalesPatch::new().qris(10.0)),
            SalesRow::from_patch(
                RowId::new("b"),
                &SalesPatch::new().name("Jordan").cash(40.0),
            ),
        ];
        let series = ChartSeries::from_rows(&rows);
        assert_eq!(series.labels, vec!["Item", "Jordan"]);
        assert_eq!(series.values(Channel::Cash), &[0.0, 40.0]);
        assert_eq!(series.max_value, 40.0);
        assert_eq!(series.scale(20.0, 172.0), 86.0);
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(short_label("New Balance 550"), "New Bala…");
        assert_eq!(short_label("Vans"), "Vans");
    }
}
