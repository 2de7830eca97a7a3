//! Named presets of sales-row fields, kept in their own slot.

use std::{collections::BTreeMap, sync::Arc};

use serde::Deserialize;
use tracing::{debug, warn};
use ws_domain::{LegacyItemTemplate, SalesPatch, SalesRow, Template};

use crate::{
    storage::{read_slot, slot_present, write_slot},
    CoreResult, KeyValueStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSlots {
    pub templates: String,
    /// Older slot of `{id, name}` item templates, read only when `templates` is absent.
    pub legacy: Option<String>,
}

impl Default for TemplateSlots {
    fn default() -> Self {
        Self {
            templates: "ws_templates".into(),
            legacy: Some("ws_item_templates".into()),
        }
    }
}

// The slot is written as a list; older dashboards kept a `name -> fields` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTemplates {
    List(Vec<Template>),
    Map(BTreeMap<String, SalesPatch>),
}

impl From<StoredTemplates> for Vec<Template> {
    fn from(stored: StoredTemplates) -> Self {
        match stored {
            StoredTemplates::List(templates) => templates,
            StoredTemplates::Map(map) => map
                .into_iter()
                .map(|(name, fields)| Template::new(name, fields))
                .collect(),
        }
    }
}

pub struct TemplateRegistry {
    storage: Arc<dyn KeyValueStore>,
    slots: TemplateSlots,
    templates: Vec<Template>,
}

impl TemplateRegistry {
    pub fn load(storage: Arc<dyn KeyValueStore>, slots: TemplateSlots) -> Self {
        let templates = if slot_present(storage.as_ref(), &slots.templates) {
            read_slot::<StoredTemplates>(storage.as_ref(), &slots.templates)
                .map(|stored| normalize(stored.into()))
                .unwrap_or_default()
        } else {
            load_legacy(storage.as_ref(), slots.legacy.as_deref())
        };
        debug!(count = templates.len(), "templates loaded");
        Self {
            storage,
            slots,
            templates,
        }
    }

    /// Stores `fields` under `name`, replacing an existing template of that name in place.
    /// Blank names are ignored and `false` is returned.
    pub fn save_template(&mut self, name: &str, fields: SalesPatch) -> CoreResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            debug!("template save ignored, blank name");
            return Ok(false);
        }
        match self.templates.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.fields = fields,
            None => self.templates.push(Template::new(name, fields)),
        }
        self.persist()?;
        Ok(true)
    }

    /// Templates in insertion order.
    pub fn list_templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        let name = name.trim();
        self.templates.iter().find(|t| t.name == name)
    }

    /// Returns `target` with the template's defined fields overlaid, or `target` unchanged
    /// when no template is called `name`.
    pub fn apply_template(&self, target: &SalesRow, name: &str) -> SalesRow {
        let mut row = target.clone();
        if let Some(template) = self.get(name) {
            template.apply_to_row(&mut row);
        }
        row
    }

    /// Same as [`apply_template`](Self::apply_template) for a row that has not been added yet.
    pub fn apply_to_draft(&self, draft: &SalesPatch, name: &str) -> SalesPatch {
        let mut next = draft.clone();
        if let Some(template) = self.get(name) {
            template.apply_to_draft(&mut next);
        }
        next
    }

    pub fn remove_template(&mut self, name: &str) -> CoreResult<bool> {
        let name = name.trim();
        let before = self.templates.len();
        self.templates.retain(|t| t.name != name);
        if self.templates.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> CoreResult<()> {
        write_slot(self.storage.as_ref(), &self.slots.templates, &self.templates)
    }
}

fn load_legacy(storage: &dyn KeyValueStore, slot: Option<&str>) -> Vec<Template> {
    let Some(slot) = slot else {
        return Vec::new();
    };
    let legacy = read_slot::<Vec<LegacyItemTemplate>>(storage, slot).unwrap_or_default();
    if !legacy.is_empty() {
        warn!(slot, count = legacy.len(), "imported legacy item templates");
    }
    normalize(legacy.into_iter().map(Template::from).collect())
}

// Names are trimmed and blank ones dropped, matching `save_template`. Later entries win,
// keeping the position of the first occurrence.
fn normalize(templates: Vec<Template>) -> Vec<Template> {
    let mut unique: Vec<Template> = Vec::with_capacity(templates.len());
    for mut template in templates {
        let trimmed = template.name.trim();
        if trimmed.is_empty() {
            continue;
        }
        template.name = trimmed.to_string();
        match unique.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => existing.fields = template.fields,
            None => unique.push(template),
        }
    }
    unique
}
