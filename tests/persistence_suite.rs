mod common;

use std::fs;

use common::{open_workspace, test_home};
use ws_config::{Config, ConfigManager};
use ws_domain::{Collection, ExpensePatch, RowId, SalesPatch};

#[test]
fn workspace_reopens_with_same_rows_and_templates() {
    let home = test_home();
    let mut first = open_workspace(&home, "a");
    first
        .ledger_mut()
        .add_sales_row(SalesPatch::new().name("Shoe A").qris(100_000.0).cash(50_000.0))
        .expect("add sale");
    first
        .ledger_mut()
        .add_expense_row(ExpensePatch::new().name("Box").amount(20_000.0))
        .expect("add expense");
    first
        .templates_mut()
        .save_template("promo", SalesPatch::new().qris(5_000.0))
        .expect("save template");

    let second = open_workspace(&home, "b");
    assert_eq!(second.ledger().sales(), first.ledger().sales());
    assert_eq!(second.ledger().expenses(), first.ledger().expenses());
    assert_eq!(
        second.templates().list_templates(),
        first.templates().list_templates()
    );

    let totals = second.ledger().totals();
    assert_eq!(totals.total_in, 150_000.0);
    assert_eq!(totals.net_cash, 30_000.0);
    assert_eq!(second.format_amount(totals.net_cash), "Rp 30.000");
}

#[test]
fn configured_data_dir_receives_slot_files() {
    let home = test_home();
    let data = home.join("shop-data");
    let manager = ConfigManager::with_base_dir(home.clone()).expect("config manager");
    manager
        .save(&Config {
            data_dir: Some(data.clone()),
            ..Config::default()
        })
        .expect("save config");

    let mut workspace = open_workspace(&home, "s");
    workspace
        .ledger_mut()
        .add_sales_row(SalesPatch::new().name("Vans"))
        .expect("add sale");

    assert_eq!(workspace.data_dir(), data.as_path());
    assert!(data.join("ws_sales.json").exists());
    assert!(!home.join("ws_sales.json").exists());
}

#[test]
fn legacy_item_templates_are_imported_once() {
    let home = test_home();
    fs::write(
        home.join("ws_item_templates.json"),
        r#"[{"id":1718000000000,"name":"Nike Air Max"}]"#,
    )
    .expect("seed legacy slot");

    let mut workspace = open_workspace(&home, "s");
    assert_eq!(workspace.templates().list_templates().len(), 1);
    workspace
        .templates_mut()
        .save_template("Nike Air Max", SalesPatch::new().cash(300_000.0))
        .expect("save template");

    let reopened = open_workspace(&home, "s");
    let template = reopened.templates().get("Nike Air Max").expect("template");
    assert_eq!(template.fields.cash, Some(300_000.0));
}

#[test]
fn reset_removes_ledger_slots_but_keeps_templates() {
    let home = test_home();
    let mut workspace = open_workspace(&home, "s");
    workspace
        .ledger_mut()
        .add_sales_row(SalesPatch::new().name("A"))
        .expect("add sale");
    workspace
        .templates_mut()
        .save_template("t", SalesPatch::new().qris(1.0))
        .expect("save template");

    workspace.ledger_mut().clear().expect("clear");
    assert!(!workspace.ledger_mut().remove_row(Collection::Sales, &RowId::new("s1")).expect("remove"));

    let keys = workspace.backend().keys().expect("keys");
    assert_eq!(keys, vec!["ws_templates".to_string()]);
}
