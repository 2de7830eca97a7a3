//! Sales rows: one sold item with its takings split across payment channels.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{amount, Collection, Identifiable, LedgerRow, NamedEntity, RowId, UnknownName};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    #[serde(default)]
    pub id: RowId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub qris: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub transfer: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub cash: f64,
}

impl SalesRow {
    /// Amount received for this item across all channels.
    pub fn subtotal(&self) -> f64 {
        self.qris + self.transfer + self.cash
    }

    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Qris => self.qris,
            Channel::Transfer => self.transfer,
            Channel::Cash => self.cash,
        }
    }
}

impl Identifiable for SalesRow {
    fn id(&self) -> &RowId {
        &self.id
    }
}

impl NamedEntity for SalesRow {
    fn name(&self) -> &str {
        &self.name
    }
}

impl LedgerRow for SalesRow {
    type Patch = SalesPatch;

    const COLLECTION: Collection = Collection::Sales;

    fn from_patch(id: RowId, patch: &SalesPatch) -> Self {
        let mut row = Self {
            id,
            name: String::new(),
            qris: 0.0,
            transfer: 0.0,
            cash: 0.0,
        };
        row.apply(patch);
        row
    }

    fn apply(&mut self, patch: &SalesPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(qris) = patch.qris {
            self.qris = amount::coerce(qris);
        }
        if let Some(transfer) = patch.transfer {
            self.transfer = amount::coerce(transfer);
        }
        if let Some(cash) = patch.cash {
            self.cash = amount::coerce(cash);
        }
    }

    fn set_id(&mut self, id: RowId) {
        self.id = id;
    }
}

/// Payment channels a sale can be settled through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Qris,
    Transfer,
    Cash,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Qris, Channel::Transfer, Channel::Cash];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Channel::Qris => "QRIS",
            Channel::Transfer => "Transfer",
            Channel::Cash => "Cash",
        };
        f.pad(label)
    }
}

/// Partial update for a [`SalesRow`]. `None` leaves the field untouched.
///
/// Also the field set stored by templates, which is why it is serializable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "amount::lenient_opt"
    )]
    pub qris: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "amount::lenient_opt"
    )]
    pub transfer: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "amount::lenient_opt"
    )]
    pub cash: Option<f64>,
}

impl SalesPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn qris(mut self, value: f64) -> Self {
        self.qris = Some(amount::coerce(value));
        self
    }

    pub fn transfer(mut self, value: f64) -> Self {
        self.transfer = Some(amount::coerce(value));
        self
    }

    pub fn cash(mut self, value: f64) -> Self {
        self.cash = Some(amount::coerce(value));
        self
    }

    /// Sets one field from raw text input, coercing amounts.
    pub fn set_field(&mut self, field: SalesField, raw: &str) {
        match field {
            SalesField::Name => self.name = Some(raw.to_string()),
            SalesField::Qris => self.qris = Some(amount::parse(raw)),
            SalesField::Transfer => self.transfer = Some(amount::parse(raw)),
            SalesField::Cash => self.cash = Some(amount::parse(raw)),
        }
    }

    pub fn with_field(mut self, field: SalesField, raw: &str) -> Self {
        self.set_field(field, raw);
        self
    }

    /// Copies every field `other` defines over this patch.
    pub fn overlay(&mut self, other: &SalesPatch) {
        if other.name.is_some() {
            self.name = other.name.clone();
        }
        if other.qris.is_some() {
            self.qris = other.qris;
        }
        if other.transfer.is_some() {
            self.transfer = other.transfer;
        }
        if other.cash.is_some() {
            self.cash = other.cash;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.qris.is_none() && self.transfer.is_none() && self.cash.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesField {
    Name,
    Qris,
    Transfer,
    Cash,
}

impl FromStr for SalesField {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SalesField::Name),
            "qris" => Ok(SalesField::Qris),
            "transfer" => Ok(SalesField::Transfer),
            "cash" => Ok(SalesField::Cash),
            other => Err(UnknownName::Field(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_patch_defaults_missing_fields() {
        let row = SalesRow::from_patch(RowId::new("s1"), &SalesPatch::new().name("Shoe A"));
        assert_eq!(row.name, "Shoe A");
        assert_eq!((row.qris, row.transfer, row.cash), (0.0, 0.0, 0.0));
    }

    #[test]
    fn apply_only_touches_named_fields() {
        let mut row = SalesRow::from_patch(
            RowId::new("s1"),
            &SalesPatch::new().name("Shoe A").qris(100.0).transfer(200.0),
        );
        row.apply(&SalesPatch::new().cash(50.0));
        assert_eq!(row.name, "Shoe A");
        assert_eq!(row.qris, 100.0);
        assert_eq!(row.transfer, 200.0);
        assert_eq!(row.cash, 50.0);
        assert_eq!(row.subtotal(), 350.0);
    }

    #[test]
    fn set_field_coerces_text_input() {
        let patch = SalesPatch::new()
            .with_field(SalesField::Qris, "abc")
            .with_field(SalesField::Cash, "15000");
        assert_eq!(patch.qris, Some(0.0));
        assert_eq!(patch.cash, Some(15000.0));
        assert_eq!(patch.transfer, None);
    }

    #[test]
    fn deserializes_string_amounts_from_older_slots() {
        let row: SalesRow = serde_json::from_str(
            r#"{"id":1718000000000,"name":"Vans","qris":"120000","transfer":"","cash":null}"#,
        )
        .unwrap();
        assert_eq!(row.id.as_str(), "1718000000000");
        assert_eq!(row.qris, 120000.0);
        assert_eq!(row.transfer, 0.0);
        assert_eq!(row.cash, 0.0);
    }
}
