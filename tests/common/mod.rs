use std::sync::Mutex;

use finance_core::{config::ConfigManager, storage::JsonStorage};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates isolated storage and config backed by unique directories for each
/// test.
pub fn setup_test_env() -> (JsonStorage, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage =
        JsonStorage::new(Some(base.join("data")), Some(3)).expect("create json storage backend");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");

    (storage, config_manager)
}
