use std::{fs, sync::Arc};

use tempfile::tempdir;
use ws_core::{KeyValueStore, LedgerSlots, LedgerStore, SequentialIds};
use ws_domain::{ExpensePatch, SalesPatch};
use ws_storage_json::JsonFileStore;

#[test]
fn json_store_round_trips_slots() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");

    assert_eq!(store.get("ws_sales").expect("get"), None);
    store.set("ws_sales", r#"[{"id":"a","name":"Shoe"}]"#).expect("set");

    let raw = store.get("ws_sales").expect("get").expect("slot present");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value[0]["name"], "Shoe");
    assert!(store.slot_path("ws_sales").exists());
    assert_eq!(store.keys().expect("keys"), vec!["ws_sales".to_string()]);
}

#[test]
fn json_store_clear_removes_file_and_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.set("ws_expenses", "[]").expect("set");

    store.clear("ws_expenses").expect("clear");
    store.clear("ws_expenses").expect("clear again");
    assert!(!store.slot_path("ws_expenses").exists());
    assert!(store.keys().expect("keys").is_empty());
}

#[test]
fn json_store_backs_up_previous_version() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.set("ws_templates", r#"[{"name":"old"}]"#).expect("first write");
    assert!(store.list_backups("ws_templates").expect("list").is_empty());

    store.set("ws_templates", r#"[{"name":"new"}]"#).expect("second write");
    let backups = store.list_backups("ws_templates").expect("list");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].created_at.is_some());
    let saved = fs::read_to_string(&backups[0].path).expect("read backup");
    assert!(saved.contains("old"));
    assert!(store.get("ws_templates").unwrap().unwrap().contains("new"));
}

#[test]
fn json_store_keeps_one_backup_per_rapid_write() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    for version in 0..4 {
        store.set("ws_sales", &format!("[{version}]")).expect("write");
    }

    let backups = store.list_backups("ws_sales").expect("list");
    assert_eq!(backups.len(), 3);
    let newest = fs::read_to_string(&backups[0].path).expect("read backup");
    assert!(newest.contains('2'));
    let oldest = fs::read_to_string(&backups[2].path).expect("read backup");
    assert!(oldest.contains('0'));
}

#[test]
fn json_store_prunes_backups_beyond_retention() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::with_retention(dir.path().to_path_buf(), 2).expect("create store");
    let backup_dir = dir.path().join("backups").join("ws_sales");
    fs::create_dir_all(&backup_dir).expect("backup dir");
    for stamp in ["20200101_000000", "20200102_000000", "20200103_000000"] {
        fs::write(backup_dir.join(format!("ws_sales_{stamp}.json")), "[]").expect("seed");
    }

    store.set("ws_sales", "[]").expect("first write");
    store.set("ws_sales", "[1]").expect("second write");

    let backups = store.list_backups("ws_sales").expect("list");
    assert_eq!(backups.len(), 2);
    assert!(backups
        .iter()
        .all(|backup| !backup.id.contains("20200101") && !backup.id.contains("20200102")));
}

#[test]
fn ledger_store_persists_through_files() {
    let dir = tempdir().expect("tempdir");
    let backend = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("create store"));

    let mut ledger = LedgerStore::load(
        backend.clone(),
        Box::new(SequentialIds::new("s")),
        LedgerSlots::default(),
    );
    ledger
        .add_sales_row(SalesPatch::new().name("Shoe A").qris(100_000.0).cash(50_000.0))
        .expect("add sale");
    ledger
        .add_expense_row(ExpensePatch::new().name("Box").amount(20_000.0))
        .expect("add expense");

    let reopened = LedgerStore::load(
        backend,
        Box::new(SequentialIds::new("s")),
        LedgerSlots::default(),
    );
    assert_eq!(reopened.sales(), ledger.sales());
    assert_eq!(reopened.expenses(), ledger.expenses());
    assert_eq!(reopened.totals().net_cash, 30_000.0);
}

#[test]
fn corrupt_slot_file_loads_as_empty_ledger() {
    let dir = tempdir().expect("tempdir");
    let backend = Arc::new(JsonFileStore::new(dir.path().to_path_buf()).expect("create store"));
    fs::write(backend.slot_path("ws_sales"), "{ this is not json").expect("write garbage");

    let ledger = LedgerStore::load(
        backend,
        Box::new(SequentialIds::new("s")),
        LedgerSlots::default(),
    );
    assert!(ledger.sales().is_empty());
}
