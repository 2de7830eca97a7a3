//! Expense rows: cash paid out, netted against cash takings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{amount, Collection, Identifiable, LedgerRow, NamedEntity, RowId, UnknownName};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    #[serde(default)]
    pub id: RowId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub amount: f64,
}

impl Identifiable for ExpenseRow {
    fn id(&self) -> &RowId {
        &self.id
    }
}

impl NamedEntity for ExpenseRow {
    fn name(&self) -> &str {
        &self.name
    }
}

impl LedgerRow for ExpenseRow {
    type Patch = ExpensePatch;

    const COLLECTION: Collection = Collection::Expenses;

    fn from_patch(id: RowId, patch: &ExpensePatch) -> Self {
        let mut row = Self {
            id,
            name: String::new(),
            amount: 0.0,
        };
        row.apply(patch);
        row
    }

    fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(value) = patch.amount {
            self.amount = amount::coerce(value);
        }
    }

    fn set_id(&mut self, id: RowId) {
        self.id = id;
    }
}

/// Partial update for an [`ExpenseRow`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
}

impl ExpensePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn amount(mut self, value: f64) -> Self {
        self.amount = Some(amount::coerce(value));
        self
    }

    pub fn set_field(&mut self, field: ExpenseField, raw: &str) {
        match field {
            ExpenseField::Name => self.name = Some(raw.to_string()),
            ExpenseField::Amount => self.amount = Some(amount::parse(raw)),
        }
    }

    pub fn with_field(mut self, field: ExpenseField, raw: &str) -> Self {
        self.set_field(field, raw);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Name,
    Amount,
}

impl FromStr for ExpenseField {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(ExpenseField::Name),
            "amount" => Ok(ExpenseField::Amount),
            other => Err(UnknownName::Field(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amounts_are_clamped() {
        let row = ExpenseRow::from_patch(RowId::new("e1"), &ExpensePatch::new().amount(-10.0));
        assert_eq!(row.amount, 0.0);
        assert!(row.name.is_empty());
    }

    #[test]
    fn field_names_are_case_insensitive() {
        assert_eq!("Amount".parse::<ExpenseField>().unwrap(), ExpenseField::Amount);
        assert!("qris".parse::<ExpenseField>().is_err());
    }
}
