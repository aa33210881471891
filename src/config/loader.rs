//! Configuration loader
//!
//! Resolves `<CFG_PATH>/<name>.env`, checks it exists and is non-empty,
//! parses it, layers environment overrides on top and derives `db_url`.
//!
//! Each [`ConfigLoader`] owns its state. The process environment is read once
//! when a loader is built with [`ConfigLoader::from_env`] and never written.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use super::env_file;
use super::{compute_db_url, Config};
use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming the directory that holds config files
pub const CFG_PATH_ENV: &str = "CFG_PATH";

/// Extension of config files inside the config directory
pub const CONFIG_EXTENSION: &str = "env";

/// Loads named configurations from one directory
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    cfg_path: Option<PathBuf>,
    overrides: BTreeMap<&'static str, OsString>,
}

impl ConfigLoader {
    /// Loader for an explicit config directory, with no overrides
    pub fn new(cfg_path: impl Into<PathBuf>) -> Self {
        Self {
            cfg_path: Some(cfg_path.into()),
            overrides: BTreeMap::new(),
        }
    }

    /// Snapshot `CFG_PATH` and the recognized override keys from the process
    /// environment. Overrides only replace keys the config file defines. A missing `CFG_PATH` only fails once [`load`](Self::load)
    /// is called.
    pub fn from_env() -> Self {
        let cfg_path = env::var_os(CFG_PATH_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let overrides = env_file::recognized_keys()
            .filter_map(|tag| env::var_os(tag).map(|value| (tag, value)))
            .collect();

        Self { cfg_path, overrides }
    }

    /// Add an override for `key`. Keys that name no field are ignored.
    pub fn with_override(mut self, key: &str, value: impl Into<OsString>) -> Self {
        match env_file::recognized_key(key) {
            Some(tag) => {
                self.overrides.insert(tag, value.into());
            }
            None => tracing::debug!(key, "ignoring override for unrecognized key"),
        }
        self
    }

    /// Directory config files are read from, if configured
    pub fn cfg_path(&self) -> Option<&Path> {
        self.cfg_path.as_deref()
    }

    /// Resolve the file backing config `name`
    pub fn config_file(&self, name: &str) -> ConfigResult<PathBuf> {
        let dir = self.cfg_path.as_ref().ok_or(ConfigError::MissingPath)?;
        Ok(dir.join(format!("{}.{}", name, CONFIG_EXTENSION)))
    }

    /// Load config `name`.
    ///
    /// # Errors
    /// - `ConfigError::MissingPath` if no config directory is set
    /// - `ConfigError::FileNotFound` if the file cannot be statted
    /// - `ConfigError::EmptyFile` if the file has zero length
    /// - `ConfigError::Parse` if the file is not valid env-file syntax
    /// - `ConfigError::Unmarshal` if an override value is not valid unicode
    pub fn load(&self, name: &str) -> ConfigResult<Config> {
        let path = self.config_file(name)?;
        tracing::debug!(path = %path.display(), "loading config file");

        let metadata = fs::metadata(&path).map_err(|source| ConfigError::FileNotFound {
            path: path.clone(),
            source,
        })?;
        if metadata.len() == 0 {
            return Err(ConfigError::EmptyFile { path });
        }

        let pairs = env_file::parse_env_file(&path)?;
        let parsed = pairs.len();
        let mut values = env_file::recognized_values(pairs);
        tracing::debug!(parsed, recognized = values.len(), "parsed config file");

        self.apply_overrides(&mut values)?;

        let mut config = env_file::build_config(values);
        config.db_url = compute_db_url(&config);

        tracing::info!(
            name,
            environment = %config.environment,
            db_url = %config.redacted().db_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load config `name`, terminating the process if that fails.
    ///
    /// Meant for startup, where a broken config leaves nothing useful to do.
    pub fn must_load(&self, name: &str) -> Config {
        match self.load(name) {
            Ok(config) => config,
            Err(err) => {
                if tracing::dispatcher::has_been_set() {
                    tracing::error!(name, error = %err, "Failed to load config");
                } else {
                    eprintln!("Failed to load config: {}", err);
                }
                process::exit(1);
            }
        }
    }

    fn apply_overrides(&self, values: &mut HashMap<&'static str, String>) -> ConfigResult<()> {
        for (&tag, raw) in &self.overrides {
            // only keys the file defines are overridable; set-but-empty does not override
            let Some(current) = values.get_mut(tag) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }

            let value = raw.to_str().ok_or_else(|| ConfigError::Unmarshal {
                key: tag.to_string(),
                reason: "environment value is not valid unicode".to_string(),
            })?;

            tracing::debug!(key = tag, "environment overrides config file value");
            *current = value.to_string();
        }
        Ok(())
    }
}

/// Load config `name` using `CFG_PATH` and overrides from the process
/// environment
pub fn load(name: &str) -> ConfigResult<Config> {
    ConfigLoader::from_env().load(name)
}

/// Like [`load`], but logs and exits the process on failure
pub fn must_load(name: &str) -> Config {
    ConfigLoader::from_env().must_load(name)
}
