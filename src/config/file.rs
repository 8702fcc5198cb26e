//! Manifest files on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use toml::Table;

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// A TOML manifest layer.
///
/// A required file must exist; an optional one (a local override, say) is
/// skipped when absent. With [`FileSource::allow_keys`] set, a top-level key
/// outside the list fails with [`ConfigError::UnknownManifestKey`] naming this
/// file, instead of an anonymous deserialize error after merging.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
    allowed_keys: Option<&'static [&'static str]>,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
            allowed_keys: None,
        }
    }

    /// Restricts the file's top-level keys to `keys`.
    pub fn allow_keys(mut self, keys: &'static [&'static str]) -> Self {
        self.allowed_keys = Some(keys);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<String>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound && !self.required => {
                warn!("optional manifest {} not found, skipping", self.path.display());
                Ok(None)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ConfigError::FileNotFound(self.path.clone()))
            }
            Err(source) => Err(ConfigError::ReadError {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn check_keys(&self, table: &Table) -> Result<(), ConfigError> {
        let Some(allowed) = self.allowed_keys else {
            return Ok(());
        };
        match table.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(ConfigError::UnknownManifestKey {
                path: self.path.clone(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let Some(contents) = self.read()? else {
            return Ok(vec![]);
        };

        let table: Table = toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: self.path.clone(),
            source,
        })?;
        self.check_keys(&table)?;

        debug!("loaded manifest {} ({} keys)", self.path.display(), table.len());
        Ok(vec![ConfigEntry::root(table)])
    }
}
