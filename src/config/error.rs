use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required manifest not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to deserialize manifest: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("'{key}' in manifest '{path}' is not a manifest field")]
    UnknownManifestKey { path: PathBuf, key: String },

    #[error("environment source for prefix '{0}' has an empty separator")]
    EmptySeparator(String),

    #[error("environment variable {0} is not valid unicode")]
    NonUnicodeEnv(String),

    #[error("circular reference detected in manifest")]
    CircularReference,

    #[error("referenced path not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid reference path: {0}")]
    InvalidReferencePath(String),

    #[error("cannot reference non-scalar value: {0}")]
    NonScalarReference(String),

    #[error("expanding '{0}' exceeds {max} bytes", max = super::interpolate::MAX_EXPANDED_LEN)]
    ExpansionTooLarge(String),

    #[error("unclosed reference (missing '}}')")]
    UnclosedReference,
}
