//! Named presets of sales-row fields used to speed up data entry.

use serde::{Deserialize, Serialize};

use crate::{LedgerRow, NamedEntity, SalesPatch, SalesRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub fields: SalesPatch,
}

impl Template {
    pub fn new(name: impl Into<String>, fields: SalesPatch) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Overlays the template's defined fields onto a stored row.
    pub fn apply_to_row(&self, row: &mut SalesRow) {
        row.apply(&self.fields);
    }

    /// Overlays the template's defined fields onto a draft that has not been added yet.
    pub fn apply_to_draft(&self, draft: &mut SalesPatch) {
        draft.overlay(&self.fields);
    }
}

impl NamedEntity for Template {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Entry of the older item-template slot, which only remembered a label.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyItemTemplate {
    #[serde(default)]
    pub id: crate::RowId,
    #[serde(default)]
    pub name: String,
}

impl From<LegacyItemTemplate> for Template {
    fn from(legacy: LegacyItemTemplate) -> Self {
        let fields = SalesPatch::new().name(legacy.name.clone());
        Template::new(legacy.name, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RowId;

    #[test]
    fn apply_changes_only_overlapping_fields() {
        let template = Template::new("promo", SalesPatch::new().qris(5000.0).cash(1000.0));
        let mut row = SalesRow::from_patch(RowId::new("s1"), &SalesPatch::new().transfer(200.0));
        template.apply_to_row(&mut row);
        assert_eq!(row.qris, 5000.0);
        assert_eq!(row.transfer, 200.0);
        assert_eq!(row.cash, 1000.0);
        assert_eq!(row.name, "");
    }

    #[test]
    fn legacy_entry_becomes_name_only_template() {
        let legacy: LegacyItemTemplate =
            serde_json::from_str(r#"{"id":1718000000000,"name":"Nike Air Max"}"#).unwrap();
        let template = Template::from(legacy);
        assert_eq!(template.name, "Nike Air Max");
        assert_eq!(template.fields.name.as_deref(), Some("Nike Air Max"));
        assert!(template.fields.qris.is_none());
    }
}
