use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_DIR_NAME: &str = ".warrior_ledger";

/// User-configurable preferences for the ledger tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default)]
    pub storage_keys: StorageKeys,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding the slot files. Defaults to `~/.warrior_ledger`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            storage_keys: StorageKeys::default(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "id-ID".into()
    }

    pub fn default_currency() -> String {
        "IDR".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// Base directory used when nothing overrides it.
    pub fn default_home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }
}

/// Slot keys for each persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub sales: String,
    pub expenses: String,
    pub templates: String,
    /// Older `{id, name}` item-template slot, read when `templates` is empty.
    pub legacy_templates: Option<String>,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            sales: "ws_sales".into(),
            expenses: "ws_expenses".into(),
            templates: "ws_templates".into(),
            legacy_templates: Some("ws_item_templates".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"currency":"IDR","storage_keys":{"sales":"shop_sales"}}"#)
                .unwrap();
        assert_eq!(cfg.locale, "id-ID");
        assert_eq!(cfg.backup_retention, 5);
        assert_eq!(cfg.storage_keys.sales, "shop_sales");
        assert_eq!(cfg.storage_keys.expenses, "ws_expenses");
        assert!(cfg.ui_color_enabled);
    }

    #[test]
    fn data_dir_is_omitted_until_set() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("data_dir"));
        assert!(Config::default_home().ends_with(DEFAULT_DIR_NAME));
    }
}
