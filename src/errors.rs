use thiserror::Error;
use ws_config::ConfigError;
use ws_core::CoreError;

/// Failures while opening or driving a workspace.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Slot keys `{first}` and `{second}` both map to {file}")]
    SlotCollision {
        first: String,
        second: String,
        file: String,
    },
}

pub type AppResult<T> = Result<T, AppError>;
