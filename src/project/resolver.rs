use std::path::Path;

use log::debug;
use serde::Serialize;

use super::{BuildMode, ProjectConfig, ResolveError, ToolchainSpec};

/// A project with its mode-specific flags applied. Read-only once built, and
/// only [`resolve`] builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    name: String,
    #[serde(rename = "main")]
    entry_file: String,
    mode: BuildMode,
    #[serde(rename = "libs")]
    libraries: Vec<String>,
    flags: Vec<String>,
    #[serde(rename = "cc")]
    toolchain: ToolchainSpec,
}

impl ResolvedConfig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_file(&self) -> &str {
        &self.entry_file
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// Base flags followed by the mode flag.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn toolchain(&self) -> &ToolchainSpec {
        &self.toolchain
    }

    pub fn compiler(&self) -> &str {
        &self.toolchain.compiler_command
    }

    pub fn debugger(&self) -> &str {
        &self.toolchain.debugger_command
    }

    /// Compiler arguments: flags, entry file, `-o <name>`, then `-l<lib>` per
    /// library in declaration order.
    pub fn compile_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.flags.len() + 3 + self.libraries.len());
        args.extend(self.flags.iter().cloned());
        args.push(self.entry_file.clone());
        args.push("-o".to_string());
        args.push(self.name.clone());
        args.extend(self.libraries.iter().map(|lib| format!("-l{lib}")));
        args
    }
}

/// Resolves `config` for `mode`.
///
/// The mode flag (`-O` for release, `-g` for debug) is appended after the base
/// flags. `config` is only borrowed; the result owns copies of everything.
pub fn resolve(config: &ProjectConfig, mode: BuildMode) -> Result<ResolvedConfig, ResolveError> {
    validate(config)?;

    let mut flags = Vec::with_capacity(config.base_flags.len() + 1);
    flags.extend(config.base_flags.iter().cloned());
    flags.push(mode.flag().to_string());

    debug!(
        "resolved '{}' for {mode}: {} flag(s)",
        config.name,
        flags.len()
    );

    Ok(ResolvedConfig {
        name: config.name.clone(),
        entry_file: config.entry_file.clone(),
        mode,
        libraries: config.libraries.clone(),
        flags,
        toolchain: config.toolchain.clone(),
    })
}

fn validate(config: &ProjectConfig) -> Result<(), ResolveError> {
    if config.entry_file.trim().is_empty() {
        return Err(ResolveError::InvalidConfig {
            field: "main",
            reason: "must not be empty",
        });
    }
    if Path::new(&config.entry_file).has_root() {
        return Err(ResolveError::InvalidConfig {
            field: "main",
            reason: "must be a relative path",
        });
    }
    if config.toolchain.compiler_command.trim().is_empty() {
        return Err(ResolveError::InvalidConfig {
            field: "cc.cmd",
            reason: "must not be empty",
        });
    }
    Ok(())
}
