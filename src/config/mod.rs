//! Manifest loading: layered sources, merging and `${...}` interpolation.

mod builder;
mod env;
mod error;
mod file;
mod interpolate;
mod source;

pub use builder::Loader;
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{ConfigEntry, ConfigSource, TableSource};
