use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;

use super::env::EnvSource;
use super::file::FileSource;
use super::interpolate::interpolate;
use super::source::{merge_at_path, ConfigSource, TableSource};
use super::ConfigError;
use crate::project::ProjectConfig;

/// Builder for loading a project manifest from layered sources.
///
/// Sources are merged in registration order, with later sources overriding
/// earlier ones. Nested tables are merged recursively; other values
/// (including arrays such as `flags`) are replaced entirely.
///
/// ## Interpolation
///
/// String values can reference other manifest values using `${path.to.field}`:
///
/// ```toml
/// name = "ray_tracing"
/// main = "src/${name}.cpp"
/// ```
///
/// Use `$$` to escape a literal `$` (e.g., `$${VAR}` becomes `${VAR}`).
///
/// ## Example
///
/// ```no_run
/// use mek_resolve::{Loader, ProjectConfig};
///
/// let project: ProjectConfig = Loader::builder()
///     .with_manifest("mek.toml", true)
///     .with_manifest("mek.local.toml", false)
///     .with_env("MEK", "__")
///     .build()?;
/// # Ok::<(), mek_resolve::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Loader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Loader {
    /// Creates a new loader.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file with no restriction on its keys.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds a project manifest: a TOML file whose top-level keys must be
    /// manifest fields, so a typo is reported against the file that has it.
    pub fn with_manifest(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required).allow_keys(ProjectConfig::MANIFEST_KEYS))
    }

    /// Adds overrides from environment variables with the given prefix.
    ///
    /// Variables map to manifest paths by removing the prefix and separator,
    /// splitting the rest on the separator and lowercasing each segment.
    /// With prefix `MEK` and separator `__`, `MEK__CC__CMD=clang` sets `cc.cmd`.
    ///
    /// Values are read as TOML literals (`true`, `3`, `["-Wall"]`); anything
    /// else, like `clang++`, is taken as a plain string.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds an in-memory table, e.g. built-in defaults registered first.
    pub fn with_table(self, table: toml::Table) -> Self {
        self.with_source(TableSource::new(table))
    }

    /// Adds any other [`ConfigSource`].
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Loads, merges and interpolates every source into one table.
    pub fn build_table(self) -> Result<toml::Table, ConfigError> {
        let mut merged = toml::Table::new();

        for source in &self.sources {
            let entries = source.entries()?;
            debug!("merging {} entries from {:?}", entries.len(), source);
            for entry in entries {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        interpolate(&mut merged)?;
        Ok(merged)
    }

    /// Builds the manifest and deserializes it into `T`.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let merged = self.build_table()?;
        toml::Value::Table(merged)
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }
}
