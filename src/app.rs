//! Wires configuration, the JSON slot backend, the ledger store and the template registry
//! into one workspace rooted at a home directory.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, warn};
use ws_config::{Config, ConfigManager, StorageKeys};
use ws_core::{
    export, CurrencyFormatter, IdGenerator, KeyValueStore, LedgerSlots, LedgerStore,
    RupiahFormatter, TemplateRegistry, TemplateSlots, UuidIds,
};
use ws_domain::Collection;
use ws_storage_json::JsonFileStore;

use crate::{
    errors::{AppError, AppResult},
    utils,
};

pub struct Workspace {
    config: Config,
    data_dir: PathBuf,
    backend: Arc<JsonFileStore>,
    ledger: LedgerStore,
    templates: TemplateRegistry,
    formatter: Box<dyn CurrencyFormatter>,
}

impl Workspace {
    /// Opens the workspace at `WARRIOR_LEDGER_HOME`, falling back to `~/.warrior_ledger`.
    /// The environment override also pins the data directory.
    pub fn open_default() -> AppResult<Self> {
        match utils::home_override() {
            Some(home) => Self::open_with(home.clone(), Some(home), Box::new(UuidIds)),
            None => Self::open_with(Config::default_home(), None, Box::new(UuidIds)),
        }
    }

    /// Config lives under `<home>/config`; slots go to `Config::data_dir` or `home`.
    pub fn open(home: PathBuf) -> AppResult<Self> {
        Self::open_with(home, None, Box::new(UuidIds))
    }

    pub fn open_with(
        home: PathBuf,
        data_dir: Option<PathBuf>,
        ids: Box<dyn IdGenerator>,
    ) -> AppResult<Self> {
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        let data_dir = data_dir
            .or_else(|| config.data_dir.clone())
            .unwrap_or(home);

        let backend = Arc::new(JsonFileStore::with_retention(
            data_dir.clone(),
            config.backup_retention,
        )?);
        ensure_distinct_slots(&backend, &config.storage_keys)?;
        let storage: Arc<dyn KeyValueStore> = backend.clone();
        let ledger = LedgerStore::load(storage.clone(), ids, ledger_slots(&config.storage_keys));
        let templates = TemplateRegistry::load(storage, template_slots(&config.storage_keys));
        let formatter = formatter_for(&config.currency);

        info!(data_dir = %data_dir.display(), "workspace opened");
        Ok(Self {
            config,
            data_dir,
            backend,
            ledger,
            templates,
            formatter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backend(&self) -> &JsonFileStore {
        &self.backend
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut LedgerStore {
        &mut self.ledger
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn templates_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.templates
    }

    pub fn format_amount(&self, amount: f64) -> String {
        self.formatter.format_amount(amount)
    }

    /// Writes one collection as CSV and returns the number of rows written.
    pub fn export_csv(&self, collection: Collection, path: &Path) -> AppResult<usize> {
        let (text, count) = match collection {
            Collection::Sales => (
                export::sales_to_csv(self.ledger.sales())?,
                self.ledger.sales().len(),
            ),
            Collection::Expenses => (
                export::expenses_to_csv(self.ledger.expenses())?,
                self.ledger.expenses().len(),
            ),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        info!(%collection, rows = count, path = %path.display(), "exported csv");
        Ok(count)
    }

    /// Appends the rows of a CSV file produced by [`export_csv`](Self::export_csv). Imported
    /// rows get fresh ids.
    pub fn import_csv(&mut self, collection: Collection, path: &Path) -> AppResult<usize> {
        let text = fs::read_to_string(path)?;
        let count = match collection {
            Collection::Sales => {
                let patches = export::parse_sales_csv(&text)?;
                for patch in &patches {
                    self.ledger.add_sales_row(patch.clone())?;
                }
                patches.len()
            }
            Collection::Expenses => {
                let patches = export::parse_expenses_csv(&text)?;
                for patch in &patches {
                    self.ledger.add_expense_row(patch.clone())?;
                }
                patches.len()
            }
        };
        info!(%collection, rows = count, path = %path.display(), "imported csv");
        Ok(count)
    }
}

pub fn ledger_slots(keys: &StorageKeys) -> LedgerSlots {
    LedgerSlots {
        sales: keys.sales.clone(),
        expenses: keys.expenses.clone(),
    }
}

pub fn template_slots(keys: &StorageKeys) -> TemplateSlots {
    TemplateSlots {
        templates: keys.templates.clone(),
        legacy: keys.legacy_templates.clone(),
    }
}

/// Each configured key must land in its own slot file.
fn ensure_distinct_slots(backend: &JsonFileStore, keys: &StorageKeys) -> AppResult<()> {
    let mut seen: Vec<(&str, PathBuf)> = Vec::new();
    let configured = [
        Some(keys.sales.as_str()),
        Some(keys.expenses.as_str()),
        Some(keys.templates.as_str()),
        keys.legacy_templates.as_deref(),
    ];
    for key in configured.into_iter().flatten() {
        let path = backend.slot_path(key);
        if let Some((first, _)) = seen.iter().find(|(_, existing)| *existing == path) {
            return Err(AppError::SlotCollision {
                first: (*first).to_string(),
                second: key.to_string(),
                file: path.display().to_string(),
            });
        }
        seen.push((key, path));
    }
    Ok(())
}

fn formatter_for(currency: &str) -> Box<dyn CurrencyFormatter> {
    if !currency.eq_ignore_ascii_case("IDR") {
        warn!(currency, "unsupported currency, amounts shown in rupiah");
    }
    Box::new(RupiahFormatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use ws_core::SequentialIds;
    use ws_domain::{ExpensePatch, SalesPatch};

    fn open(home: &Path) -> Workspace {
        Workspace::open_with(home.to_path_buf(), None, Box::new(SequentialIds::new("w"))).unwrap()
    }

    #[test]
    fn slots_follow_configured_keys() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.storage_keys.sales = "shop_sales".into();
        manager.save(&config).unwrap();

        let mut workspace = open(dir.path());
        workspace
            .ledger_mut()
            .add_sales_row(SalesPatch::new().name("A"))
            .unwrap();
        assert!(workspace.backend().slot_path("shop_sales").exists());
        assert!(!workspace.backend().slot_path("ws_sales").exists());
    }

    #[test]
    fn colliding_slot_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.storage_keys.expenses = "WS-SALES".into();
        manager.save(&config).unwrap();

        let result =
            Workspace::open_with(dir.path().to_path_buf(), None, Box::new(SequentialIds::new("w")));
        match result {
            Err(AppError::SlotCollision { first, second, .. }) => {
                assert_eq!(first, "ws_sales");
                assert_eq!(second, "WS-SALES");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("colliding keys were accepted"),
        }
    }

    #[test]
    fn csv_export_then_import_appends_copies() {
        let dir = tempdir().unwrap();
        let mut workspace = open(dir.path());
        workspace
            .ledger_mut()
            .add_expense_row(ExpensePatch::new().name("Box, big").amount(20_000.0))
            .unwrap();
        let path = dir.path().join("out").join("Expenses.csv");

        assert_eq!(workspace.export_csv(Collection::Expenses, &path).unwrap(), 1);
        assert_eq!(workspace.import_csv(Collection::Expenses, &path).unwrap(), 1);

        let expenses = workspace.ledger().expenses();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[1].name, "Box, big");
        assert_ne!(expenses[0].id, expenses[1].id);
        assert_eq!(workspace.format_amount(workspace.ledger().totals().expense_sum), "Rp 40.000");
    }
}
