//! Env-file parsing
//!
//! Reads `KEY=VALUE` files through `dotenvy` without exporting anything into
//! the process environment, and binds tag names to [`Config`] fields through
//! an explicit setter table.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::Config;
use crate::error::{ConfigError, ConfigResult};

/// Assigns one string value to one [`Config`] field
pub type FieldSetter = fn(&mut Config, String);

/// Tag name to field binding. `DB_URL` is deliberately absent: it is derived.
pub static FIELDS: &[(&str, FieldSetter)] = &[
    ("ENVIRONMENT", |c: &mut Config, v: String| c.environment = v),
    ("HOST", |c: &mut Config, v: String| c.host = v),
    ("PORT", |c: &mut Config, v: String| c.port = v),
    ("MYSQL_USER", |c: &mut Config, v: String| c.db_username = v),
    ("MYSQL_PASS", |c: &mut Config, v: String| c.db_password = v),
    ("MYSQL_HOST", |c: &mut Config, v: String| c.db_host = v),
    ("MYSQL_PORT", |c: &mut Config, v: String| c.db_port = v),
    ("MYSQL_DB", |c: &mut Config, v: String| c.db_name = v),
    ("MYSQL_DB_TEST", |c: &mut Config, v: String| c.db_name_test = v),
    ("APP_DOMAIN", |c: &mut Config, v: String| c.app_domain = v),
];

/// Recognized tag names, in field order
pub fn recognized_keys() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|(tag, _)| *tag)
}

/// Canonical tag for `key`, if it names a field. Matching is exact.
pub fn recognized_key(key: &str) -> Option<&'static str> {
    recognized_keys().find(|tag| *tag == key)
}

/// Parse an env file into its `(key, value)` pairs, in file order.
///
/// Comments, blank lines, quoting and `export` prefixes follow the dotenv
/// convention. Only `$NAME` / `${NAME}` references whose name starts with an
/// upper-case letter or digit are expanded; any other `$` is kept literally.
/// The process environment is left untouched.
pub fn parse_env_file(path: &Path) -> ConfigResult<Vec<(String, String)>> {
    let parse_error = |source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let contents = fs::read_to_string(path).map_err(|err| parse_error(dotenvy::Error::Io(err)))?;
    let escaped = escape_literal_dollars(&contents);

    dotenvy::from_read_iter(escaped.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(parse_error)
}

/// Backslash-escape every `$` that does not start an upper-case reference,
/// outside single quotes and comments, so dotenvy keeps it as written.
fn escape_literal_dollars(contents: &str) -> String {
    let chars: Vec<char> = contents.chars().collect();
    let mut out = String::with_capacity(contents.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if escaped {
            escaped = false;
            out.push(c);
            i += 1;
            continue;
        }

        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('\''), _) => {}
            (_, '\\') => escaped = true,
            (Some('"'), '"') => quote = None,
            (None, '"' | '\'') => quote = Some(c),
            (None, '#') if i == 0 || chars[i - 1].is_whitespace() => {
                while i < chars.len() && chars[i] != '\n' {
                    out.push(chars[i]);
                    i += 1;
                }
                continue;
            }
            (_, '$') if !starts_reference(&chars[i + 1..]) => out.push('\\'),
            _ => {}
        }

        out.push(c);
        i += 1;
    }
    out
}

fn starts_reference(rest: &[char]) -> bool {
    let is_name_start = |c: &char| c.is_ascii_uppercase() || c.is_ascii_digit();
    match rest {
        [c, ..] if is_name_start(c) => true,
        ['{', c, ..] if is_name_start(c) => true,
        _ => false,
    }
}

/// Keep the pairs whose key names a field. Later duplicates win.
pub fn recognized_values(pairs: Vec<(String, String)>) -> HashMap<&'static str, String> {
    let mut values = HashMap::new();
    for (key, value) in pairs {
        match recognized_key(&key) {
            Some(tag) => {
                values.insert(tag, value);
            }
            None => tracing::trace!(key = %key, "ignoring unrecognized config key"),
        }
    }
    values
}

/// Build a [`Config`] from recognized values. Missing keys stay empty and
/// `db_url` is left for the caller to derive.
pub fn build_config(mut values: HashMap<&'static str, String>) -> Config {
    let mut config = Config::default();
    for (tag, set) in FIELDS {
        if let Some(value) = values.remove(tag) {
            set(&mut config, value);
        }
    }
    config
}
