use std::ffi::OsString;

use toml::{Table, Value};

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Manifest overrides read from environment variables.
///
/// `MEK__CC__CMD=clang` with prefix `MEK` and separator `__` maps to `cc.cmd`.
/// Values are read as TOML literals, so `MEK__FLAGS='["-Wall", "-O2"]'`
/// replaces the flag list; anything that is not a literal stays a string.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    /// Maps `(name, value)` pairs to entries; split out so tests need not touch
    /// the process environment.
    ///
    /// Variables outside the prefix are ignored whatever their encoding.
    fn entries_from<I>(&self, vars: I) -> Result<Vec<ConfigEntry>, ConfigError>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        if self.separator.is_empty() {
            return Err(ConfigError::EmptySeparator(self.prefix.clone()));
        }

        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut entries = Vec::new();

        for (key, value) in vars {
            let Some(key) = key.to_str() else {
                continue;
            };
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            if path_str.is_empty() {
                continue;
            }
            let value = value
                .to_str()
                .ok_or_else(|| ConfigError::NonUnicodeEnv(key.to_string()))?;

            let path: Vec<String> = path_str
                .split(&self.separator)
                .map(|s| s.to_lowercase())
                .collect();

            entries.push(ConfigEntry::at_path(path, parse_literal(value)));
        }

        // env order is unspecified
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

impl ConfigSource for EnvSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        self.entries_from(std::env::vars_os())
    }
}

/// Reads `raw` as the right-hand side of a TOML assignment.
fn parse_literal(raw: &str) -> Value {
    let fallback = || Value::String(raw.to_string());
    if raw.contains('\n') {
        return fallback();
    }
    toml::from_str::<Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(fallback)
}
