use thiserror::Error;

/// Why a project could not be resolved into a build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown build mode '{0}' (expected 'release' or 'debug')")]
pub struct ParseModeError(pub String);
