use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use once_cell::sync::Lazy;
use tempfile::TempDir;
use warrior_ledger::Workspace;
use ws_core::SequentialIds;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated home directory that outlives the calling test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a workspace with deterministic `<prefix>N` row ids.
pub fn open_workspace(home: &Path, prefix: &str) -> Workspace {
    Workspace::open_with(home.to_path_buf(), None, Box::new(SequentialIds::new(prefix)))
        .expect("open workspace")
}
