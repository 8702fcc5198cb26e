pub mod config;
pub mod context;
mod error;
pub mod project;

pub use config::{ConfigError, Loader};
pub use context::{BuildContext, BuildContextBuilder};
pub use error::Error;
pub use project::{
    resolve, BuildMode, ProjectConfig, ResolveError, ResolvedConfig, ToolchainKind, ToolchainSpec,
};
