use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseModeError;

/// Compilation intent: optimized or with debug symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Release,
    #[default]
    Debug,
}

impl BuildMode {
    /// Maps the boolean `release` option of the invoking tool.
    pub fn from_release(release: bool) -> Self {
        if release {
            BuildMode::Release
        } else {
            BuildMode::Debug
        }
    }

    /// The flag appended to the base flags for this mode.
    pub fn flag(self) -> &'static str {
        match self {
            BuildMode::Release => "-O",
            BuildMode::Debug => "-g",
        }
    }

    pub fn is_release(self) -> bool {
        self == BuildMode::Release
    }
}

impl From<bool> for BuildMode {
    fn from(release: bool) -> Self {
        Self::from_release(release)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Release => f.write_str("release"),
            BuildMode::Debug => f.write_str("debug"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("release") {
            Ok(BuildMode::Release)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(BuildMode::Debug)
        } else {
            Err(ParseModeError(s.to_string()))
        }
    }
}
