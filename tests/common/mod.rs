//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use cfg_loader::config::env_file;
use cfg_loader::config::CFG_PATH_ENV;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const FULL_CONFIG: &str = "
ENVIRONMENT=production
HOST=localhost
PORT=8080
MYSQL_USER=root
MYSQL_PASS=password
MYSQL_HOST=127.0.0.1
MYSQL_PORT=3306
MYSQL_DB=mydb
MYSQL_DB_TEST=mydb_test
APP_DOMAIN=example.com
";

/// Serialize tests that touch process environment variables and start each
/// one from a clean slate: no `CFG_PATH`, no overrides.
pub fn lock_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    std::env::remove_var(CFG_PATH_ENV);
    for key in env_file::recognized_keys() {
        std::env::remove_var(key);
    }
    guard
}

/// Write `<tempdir>/<name>.env` and point `CFG_PATH` at the directory
pub fn setup_cfg_dir(name: &str, contents: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_config(&dir, name, contents);
    std::env::set_var(CFG_PATH_ENV, dir.path());
    dir
}

pub fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(format!("{}.env", name));
    fs::write(&path, contents).expect("Failed to write test config file");
    path
}
