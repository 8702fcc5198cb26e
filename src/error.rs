use crate::config::ConfigError;
use crate::project::ResolveError;
use thiserror::Error;

/// Top-level error type for the mek-resolve library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("manifest error: {0}")]
    Config(#[from] ConfigError),

    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),
}
