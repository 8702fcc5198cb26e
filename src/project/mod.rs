//! Project model and build-configuration resolution.

mod error;
mod mode;
mod resolver;
mod toolchain;

use serde::{Deserialize, Serialize};

pub use error::{ParseModeError, ResolveError};
pub use mode::BuildMode;
pub use resolver::{resolve, ResolvedConfig};
pub use toolchain::{ToolchainKind, ToolchainSpec};

/// A project as declared in its manifest.
///
/// ```toml
/// name = "ray_tracing"
/// main = "main.cpp"
/// libs = []
/// flags = ["-std=c++11", "-Wall"]
///
/// [cc]
/// cmd = "g++"
/// dbg = "gdb"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
    /// Source file containing `main`, relative to the project root.
    #[serde(rename = "main")]
    pub entry_file: String,
    #[serde(rename = "libs", default)]
    pub libraries: Vec<String>,
    #[serde(rename = "flags", default)]
    pub base_flags: Vec<String>,
    #[serde(rename = "cc", default)]
    pub toolchain: ToolchainSpec,
}

impl ProjectConfig {
    /// Top-level keys a manifest may declare.
    pub const MANIFEST_KEYS: &'static [&'static str] = &["name", "main", "libs", "flags", "cc"];

    pub fn new(
        name: impl Into<String>,
        entry_file: impl Into<String>,
        toolchain: ToolchainSpec,
    ) -> Self {
        Self {
            name: name.into(),
            entry_file: entry_file.into(),
            libraries: Vec::new(),
            base_flags: Vec::new(),
            toolchain,
        }
    }

    pub fn with_libraries<I, S>(mut self, libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libraries = libraries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// See [`resolve`].
    pub fn resolve(&self, mode: BuildMode) -> Result<ResolvedConfig, ResolveError> {
        resolve(self, mode)
    }
}
