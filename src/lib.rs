//! cfg_loader Library
//!
//! Loads a named env-file configuration from `CFG_PATH`, layers process
//! environment overrides on top and derives the MySQL connection string.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{compute_db_url, load, must_load, Config, ConfigLoader};
pub use error::{ConfigError, ConfigResult};
