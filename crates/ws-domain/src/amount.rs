//! Coercion rules for monetary fields.
//!
//! Every amount that reaches a row has passed through [`coerce`]: the value is finite and
//! never negative. Text input and persisted JSON go through [`parse`] and [`lenient`]
//! respectively, both of which fall back to zero instead of failing.

use serde::{de::IgnoredAny, Deserialize, Deserializer};

/// Clamps a raw value into a storable amount. Negative, NaN and infinite values become 0.
pub fn coerce(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses user-entered text. Blank or non-numeric input yields 0.
pub fn parse(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(coerce).unwrap_or(0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Serde adapter for persisted amounts: accepts numbers, numeric strings, `null` and
/// anything else (coerced to 0) so a single bad cell never invalidates a whole slot.
pub fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(value)) => coerce(value),
        Some(RawAmount::Text(text)) => parse(&text),
        Some(RawAmount::Other(_)) | None => 0.0,
    })
}

/// Like [`lenient`] for optional fields: `null` stays `None`, anything else is coerced.
pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        RawAmount::Number(value) => coerce(value),
        RawAmount::Text(text) => parse(&text),
        RawAmount::Other(_) => 0.0,
    }))
}
