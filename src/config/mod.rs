//! Configuration module
//!
//! The [`Config`] record, its derived connection string, and the loader that
//! fills it from `<CFG_PATH>/<name>.env` plus environment overrides.

use std::fmt;

use serde::Serialize;

pub mod env_file;
pub mod loader;

pub use loader::{load, must_load, ConfigLoader, CFG_PATH_ENV};

/// Environment value that selects the test database
pub const TEST_ENVIRONMENT: &str = "test";

/// Environment value reported by [`Config::is_production`]
pub const PRODUCTION_ENVIRONMENT: &str = "production";

const PASSWORD_MASK: &str = "***";

/// Application configuration
///
/// Every field is a plain string; keys missing from the source stay empty.
/// `db_url` is never read from a source, it is derived by [`compute_db_url`]
/// after the other fields are populated.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Deployment environment (`production`, `test`, ...)
    #[serde(rename = "ENVIRONMENT")]
    pub environment: String,

    /// Service bind host
    #[serde(rename = "HOST")]
    pub host: String,

    /// Service bind port
    #[serde(rename = "PORT")]
    pub port: String,

    #[serde(rename = "MYSQL_USER")]
    pub db_username: String,

    #[serde(rename = "MYSQL_PASS")]
    pub db_password: String,

    #[serde(rename = "MYSQL_HOST")]
    pub db_host: String,

    #[serde(rename = "MYSQL_PORT")]
    pub db_port: String,

    #[serde(rename = "MYSQL_DB")]
    pub db_name: String,

    #[serde(rename = "MYSQL_DB_TEST")]
    pub db_name_test: String,

    /// External-facing domain, optional
    #[serde(rename = "APP_DOMAIN")]
    pub app_domain: String,

    /// Derived MySQL connection string
    #[serde(rename = "DB_URL")]
    pub db_url: String,
}

impl Config {
    /// Check if running against the test database
    pub fn is_test(&self) -> bool {
        self.environment == TEST_ENVIRONMENT
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION_ENVIRONMENT
    }

    /// Address the service itself listens on
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database name selected by the environment flag
    pub fn database_name(&self) -> &str {
        if self.is_test() {
            &self.db_name_test
        } else {
            &self.db_name
        }
    }

    /// Copy with the database password masked, safe to log or print
    pub fn redacted(&self) -> Self {
        let mut masked = self.clone();
        if !masked.db_password.is_empty() {
            masked.db_password = PASSWORD_MASK.to_string();
        }
        masked.db_url = compute_db_url(&masked);
        masked
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = self.redacted();
        f.debug_struct("Config")
            .field("environment", &masked.environment)
            .field("host", &masked.host)
            .field("port", &masked.port)
            .field("db_username", &masked.db_username)
            .field("db_password", &masked.db_password)
            .field("db_host", &masked.db_host)
            .field("db_port", &masked.db_port)
            .field("db_name", &masked.db_name)
            .field("db_name_test", &masked.db_name_test)
            .field("app_domain", &masked.app_domain)
            .field("db_url", &masked.db_url)
            .finish()
    }
}

/// Build the MySQL driver connection string for `config`.
///
/// Components are inserted verbatim, no escaping. The `tcp(...)` wrapper and
/// the `parseTime=true` flag are part of the format downstream code expects.
pub fn compute_db_url(config: &Config) -> String {
    format!(
        "{}:{}@tcp({}:{})/{}?parseTime=true",
        config.db_username,
        config.db_password,
        config.db_host,
        config.db_port,
        config.database_name(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_config(environment: &str) -> Config {
        Config {
            environment: environment.to_string(),
            db_username: "root".to_string(),
            db_password: "password".to_string(),
            db_host: "127.0.0.1".to_string(),
            db_port: "3306".to_string(),
            db_name: "mydb".to_string(),
            db_name_test: "mydb_test".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_db_url_test_environment() {
        let url = compute_db_url(&db_config("test"));
        assert_eq!(url, "root:password@tcp(127.0.0.1:3306)/mydb_test?parseTime=true");
    }

    #[test]
    fn test_db_url_production_environment() {
        let url = compute_db_url(&db_config("production"));
        assert_eq!(url, "root:password@tcp(127.0.0.1:3306)/mydb?parseTime=true");
    }

    #[test]
    fn test_db_url_environment_match_is_case_sensitive() {
        assert_eq!(
            compute_db_url(&db_config("TEST")),
            "root:password@tcp(127.0.0.1:3306)/mydb?parseTime=true"
        );
        assert_eq!(
            compute_db_url(&db_config("")),
            "root:password@tcp(127.0.0.1:3306)/mydb?parseTime=true"
        );
    }

    #[test]
    fn test_db_url_does_not_escape() {
        let mut config = db_config("production");
        config.db_password = "p@ss:w/rd".to_string();
        assert_eq!(
            compute_db_url(&config),
            "root:p@ss:w/rd@tcp(127.0.0.1:3306)/mydb?parseTime=true"
        );
    }

    #[test]
    fn test_db_url_empty_config() {
        assert_eq!(compute_db_url(&Config::default()), ":@tcp(:)/?parseTime=true");
    }

    #[test]
    fn test_environment_helpers() {
        let config = db_config("production");
        assert!(config.is_production());
        assert!(!config.is_test());
        assert_eq!(config.database_name(), "mydb");

        let config = db_config("test");
        assert!(config.is_test());
        assert!(!config.is_production());
        assert_eq!(config.database_name(), "mydb_test");
    }

    #[test]
    fn test_bind_addr() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: "8080".to_string(),
            ..Config::default()
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_redacted_masks_password_everywhere() {
        let mut config = db_config("production");
        config.db_url = compute_db_url(&config);

        let masked = config.redacted();
        assert_eq!(masked.db_password, "***");
        assert_eq!(masked.db_url, "root:***@tcp(127.0.0.1:3306)/mydb?parseTime=true");
        assert_eq!(masked.db_username, config.db_username);
        // source config untouched
        assert_eq!(config.db_password, "password");
    }

    #[test]
    fn test_debug_does_not_leak_password() {
        let mut config = db_config("production");
        config.db_url = compute_db_url(&config);

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("\"password\""));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_serialize_uses_tag_names() {
        let mut config = db_config("test");
        config.db_url = compute_db_url(&config);

        let value = serde_json::to_value(config.redacted()).unwrap();
        assert_eq!(value["ENVIRONMENT"], "test");
        assert_eq!(value["MYSQL_DB_TEST"], "mydb_test");
        assert_eq!(value["MYSQL_PASS"], "***");
        assert_eq!(
            value["DB_URL"],
            "root:***@tcp(127.0.0.1:3306)/mydb_test?parseTime=true"
        );
    }
}
