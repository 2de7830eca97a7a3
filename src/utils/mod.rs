pub mod build_info;

use std::{env, path::PathBuf, sync::Once};

/// Overrides both the config location and the data directory.
pub const HOME_ENV: &str = "WARRIOR_LEDGER_HOME";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "warrior_ledger=info".parse() {
            filter = filter.add_directive(directive);
        }

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}

/// Home directory taken from `WARRIOR_LEDGER_HOME`, if set and non-empty.
pub fn home_override() -> Option<PathBuf> {
    env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
