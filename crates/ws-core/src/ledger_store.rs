//! Owner of the sales and expense collections.
//!
//! Every successful mutation writes the whole affected collection to its slot before
//! returning (write-through). The in-memory collections are authoritative: if the backend
//! rejects a write the mutation stays applied and the storage error is returned.

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, info, warn};
use ws_domain::{
    Collection, ExpensePatch, ExpenseRow, Identifiable, LedgerRow, RowId, RowPatch, SalesPatch,
    SalesRow, Totals,
};

use crate::{
    storage::{read_slot, write_slot},
    Aggregator, CoreResult, IdGenerator, KeyValueStore,
};

/// Slot keys the store writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSlots {
    pub sales: String,
    pub expenses: String,
}

impl Default for LedgerSlots {
    fn default() -> Self {
        Self {
            sales: "ws_sales".into(),
            expenses: "ws_expenses".into(),
        }
    }
}

impl LedgerSlots {
    fn key(&self, collection: Collection) -> &str {
        match collection {
            Collection::Sales => &self.sales,
            Collection::Expenses => &self.expenses,
        }
    }
}

pub struct LedgerStore {
    storage: Arc<dyn KeyValueStore>,
    ids: Box<dyn IdGenerator>,
    slots: LedgerSlots,
    sales: Vec<SalesRow>,
    expenses: Vec<ExpenseRow>,
}

impl LedgerStore {
    /// Loads both collections. Missing or corrupt slots start empty; rows with blank or
    /// duplicate ids are re-keyed so ids stay unique.
    pub fn load(
        storage: Arc<dyn KeyValueStore>,
        ids: Box<dyn IdGenerator>,
        slots: LedgerSlots,
    ) -> Self {
        let sales = read_slot::<Vec<SalesRow>>(storage.as_ref(), &slots.sales).unwrap_or_default();
        let expenses =
            read_slot::<Vec<ExpenseRow>>(storage.as_ref(), &slots.expenses).unwrap_or_default();
        let mut store = Self {
            storage,
            ids,
            slots,
            sales,
            expenses,
        };

        if rekey_duplicates(&mut store.sales, store.ids.as_mut()) > 0 {
            store.flush_after_load(Collection::Sales);
        }
        if rekey_duplicates(&mut store.expenses, store.ids.as_mut()) > 0 {
            store.flush_after_load(Collection::Expenses);
        }

        info!(
            sales = store.sales.len(),
            expenses = store.expenses.len(),
            "ledger loaded"
        );
        store
    }

    pub fn sales(&self) -> &[SalesRow] {
        &self.sales
    }

    pub fn expenses(&self) -> &[ExpenseRow] {
        &self.expenses
    }

    pub fn sales_row(&self, id: &RowId) -> Option<&SalesRow> {
        self.sales.iter().find(|row| row.id() == id)
    }

    pub fn expense_row(&self, id: &RowId) -> Option<&ExpenseRow> {
        self.expenses.iter().find(|row| row.id() == id)
    }

    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Sales => self.sales.len(),
            Collection::Expenses => self.expenses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.expenses.is_empty()
    }

    /// Recomputed from the current rows on every call.
    pub fn totals(&self) -> Totals {
        Aggregator::compute_totals(&self.sales, &self.expenses)
    }

    pub fn add_sales_row(&mut self, initial: SalesPatch) -> CoreResult<SalesRow> {
        let row = insert_row(&mut self.sales, self.ids.as_mut(), &initial);
        debug!(id = %row.id, "sales row added");
        self.persist(Collection::Sales)?;
        Ok(row)
    }

    pub fn add_expense_row(&mut self, initial: ExpensePatch) -> CoreResult<ExpenseRow> {
        let row = insert_row(&mut self.expenses, self.ids.as_mut(), &initial);
        debug!(id = %row.id, "expense row added");
        self.persist(Collection::Expenses)?;
        Ok(row)
    }

    /// Merges `patch` into the row with `id` in the collection the patch targets.
    /// Returns `false` without touching storage when no such row exists.
    pub fn update_row(&mut self, id: &RowId, patch: impl Into<RowPatch>) -> CoreResult<bool> {
        let patch = patch.into();
        let collection = patch.collection();
        let found = match &patch {
            RowPatch::Sales(patch) => apply_patch(&mut self.sales, id, patch),
            RowPatch::Expense(patch) => apply_patch(&mut self.expenses, id, patch),
        };
        if !found {
            debug!(%id, %collection, "update ignored, row not found");
            return Ok(false);
        }
        self.persist(collection)?;
        Ok(true)
    }

    /// Removes the row if present. Absent ids are a no-op.
    pub fn remove_row(&mut self, collection: Collection, id: &RowId) -> CoreResult<bool> {
        let removed = match collection {
            Collection::Sales => remove_by_id(&mut self.sales, id),
            Collection::Expenses => remove_by_id(&mut self.expenses, id),
        };
        if !removed {
            debug!(%id, %collection, "remove ignored, row not found");
            return Ok(false);
        }
        self.persist(collection)?;
        Ok(true)
    }

    /// Empties both collections and their slots. Both slots are attempted; the first
    /// storage error is returned.
    pub fn clear(&mut self) -> CoreResult<()> {
        self.sales.clear();
        self.expenses.clear();
        let sales = self.storage.clear(&self.slots.sales);
        let expenses = self.storage.clear(&self.slots.expenses);
        sales.and(expenses)?;
        info!("ledger cleared");
        Ok(())
    }

    fn persist(&self, collection: Collection) -> CoreResult<()> {
        let key = self.slots.key(collection);
        match collection {
            Collection::Sales => write_slot(self.storage.as_ref(), key, &self.sales),
            Collection::Expenses => write_slot(self.storage.as_ref(), key, &self.expenses),
        }
    }

    fn flush_after_load(&self, collection: Collection) {
        if let Err(err) = self.persist(collection) {
            warn!(%collection, error = %err, "could not persist re-keyed rows");
        }
    }
}

fn insert_row<R: LedgerRow>(rows: &mut Vec<R>, ids: &mut dyn IdGenerator, patch: &R::Patch) -> R {
    let taken: HashSet<&RowId> = rows.iter().map(|row| row.id()).collect();
    let id = fresh_id(&taken, ids);
    let row = R::from_patch(id, patch);
    rows.push(row.clone());
    row
}

/// Draws an id from the generator, suffixing it until it is unused in the collection.
fn fresh_id(taken: &HashSet<&RowId>, ids: &mut dyn IdGenerator) -> RowId {
    let candidate = ids.next_id();
    if !candidate.is_blank() && !taken.contains(&candidate) {
        return candidate;
    }
    let base = if candidate.is_blank() {
        "row".to_string()
    } else {
        candidate.to_string()
    };
    (2u64..)
        .map(|suffix| RowId::new(format!("{base}-{suffix}")))
        .find(|id| !taken.contains(id))
        .unwrap_or(candidate)
}

fn apply_patch<R: LedgerRow>(rows: &mut [R], id: &RowId, patch: &R::Patch) -> bool {
    match rows.iter_mut().find(|row| row.id() == id) {
        Some(row) => {
            row.apply(patch);
            true
        }
        None => false,
    }
}

fn remove_by_id<R: LedgerRow>(rows: &mut Vec<R>, id: &RowId) -> bool {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    rows.len() != before
}

fn rekey_duplicates<R: LedgerRow>(rows: &mut [R], ids: &mut dyn IdGenerator) -> usize {
    let collection = R::COLLECTION;
    let mut seen: HashSet<RowId> = HashSet::new();
    let mut rekeyed = 0;
    for index in 0..rows.len() {
        let current = rows[index].id().clone();
        if !current.is_blank() && seen.insert(current.clone()) {
            continue;
        }
        let fresh = {
            let taken: HashSet<&RowId> = rows.iter().map(|row| row.id()).chain(seen.iter()).collect();
            fresh_id(&taken, ids)
        };
        warn!(%collection, old = %current, new = %fresh, "re-keyed row with blank or duplicate id");
        seen.insert(fresh.clone());
        rows[index].set_id(fresh);
        rekeyed += 1;
    }
    rekeyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, SequentialIds};

    fn store_with(memory: MemoryStore) -> (LedgerStore, Arc<MemoryStore>) {
        let memory = Arc::new(memory);
        let store = LedgerStore::load(
            memory.clone(),
            Box::new(SequentialIds::new("r")),
            LedgerSlots::default(),
        );
        (store, memory)
    }

    #[test]
    fn add_defaults_and_appends_in_order() {
        let (mut store, memory) = store_with(MemoryStore::new());
        let first = store.add_sales_row(SalesPatch::new()).unwrap();
        let second = store
            .add_sales_row(SalesPatch::new().name("Shoe B").cash(10.0))
            .unwrap();

        assert_eq!(first.id.as_str(), "r1");
        assert_eq!(first.name, "");
        assert_eq!(first.subtotal(), 0.0);
        assert_eq!(second.id.as_str(), "r2");
        let names: Vec<_> = store.sales().iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["", "Shoe B"]);
        assert!(memory.get("ws_sales").unwrap().unwrap().contains("Shoe B"));
    }

    #[test]
    fn update_preserves_other_fields_and_position() {
        let (mut store, _) = store_with(MemoryStore::new());
        let a = store
            .add_sales_row(SalesPatch::new().name("A").qris(10.0).cash(5.0))
            .unwrap();
        store.add_sales_row(SalesPatch::new().name("B")).unwrap();

        assert!(store.update_row(&a.id, SalesPatch::new().cash(7.0)).unwrap());
        let updated = &store.sales()[0];
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.name, "A");
        assert_eq!(updated.qris, 10.0);
        assert_eq!(updated.cash, 7.0);
    }

    #[test]
    fn update_unknown_id_does_not_write() {
        let (mut store, memory) = store_with(MemoryStore::new());
        let changed = store
            .update_row(&RowId::new("missing"), ExpensePatch::new().amount(5.0))
            .unwrap();
        assert!(!changed);
        assert!(memory.get("ws_expenses").unwrap().is_none());
    }

    #[test]
    fn patch_variant_selects_collection() {
        let (mut store, _) = store_with(MemoryStore::new());
        let sale = store.add_sales_row(SalesPatch::new().name("A")).unwrap();
        let changed = store
            .update_row(&sale.id, ExpensePatch::new().name("not a sale"))
            .unwrap();
        assert!(!changed);
        assert_eq!(store.sales()[0].name, "A");
    }

    #[test]
    fn remove_absent_id_leaves_collection_unchanged() {
        let (mut store, _) = store_with(MemoryStore::new());
        store.add_expense_row(ExpensePatch::new().name("Box").amount(2.0)).unwrap();
        let before = store.expenses().to_vec();
        assert!(!store.remove_row(Collection::Expenses, &RowId::new("nope")).unwrap());
        assert_eq!(store.expenses(), before.as_slice());
    }

    #[test]
    fn duplicate_ids_in_slot_are_rekeyed_on_load() {
        let memory = MemoryStore::new().with_slot(
            "ws_sales",
            r#"[{"id":"x","name":"A"},{"id":"x","name":"B"},{"name":"C"}]"#,
        );
        let (store, _) = store_with(memory);
        let ids: HashSet<_> = store.sales().iter().map(|row| row.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(store.sales()[0].id.as_str(), "x");
        assert_eq!(store.sales()[1].name, "B");
    }

    #[test]
    fn generator_collisions_with_loaded_rows_are_suffixed() {
        let memory = MemoryStore::new().with_slot("ws_expenses", r#"[{"id":"r1","name":"old"}]"#);
        let (mut store, _) = store_with(memory);
        let row = store.add_expense_row(ExpensePatch::new()).unwrap();
        assert_eq!(row.id.as_str(), "r1-2");
    }

    #[test]
    fn clear_empties_rows_and_slots() {
        let (mut store, memory) = store_with(MemoryStore::new());
        store.add_sales_row(SalesPatch::new().name("A")).unwrap();
        store.add_expense_row(ExpensePatch::new().name("B")).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(memory.keys().is_empty());
    }
}
