//! Compiler/debugger selection (`[cc]` in the manifest).

use serde::{Deserialize, Serialize};

/// Compiler configuration family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolchainKind {
    #[default]
    GccClang,
    AvrGcc,
    Emscripten,
}

impl ToolchainKind {
    pub fn default_compiler(self) -> &'static str {
        match self {
            ToolchainKind::GccClang => "gcc",
            ToolchainKind::AvrGcc => "avr-gcc",
            ToolchainKind::Emscripten => "emcc",
        }
    }

    pub fn default_debugger(self) -> &'static str {
        match self {
            ToolchainKind::GccClang | ToolchainKind::Emscripten => "gdb",
            ToolchainKind::AvrGcc => "avr-gdb",
        }
    }
}

/// The compiler and debugger commands used to build and debug a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ToolchainDecl")]
pub struct ToolchainSpec {
    pub kind: ToolchainKind,
    #[serde(rename = "cmd")]
    pub compiler_command: String,
    #[serde(rename = "dbg")]
    pub debugger_command: String,
}

impl ToolchainSpec {
    pub fn new(compiler: impl Into<String>, debugger: impl Into<String>) -> Self {
        Self {
            kind: ToolchainKind::default(),
            compiler_command: compiler.into(),
            debugger_command: debugger.into(),
        }
    }

    /// The kind's default commands.
    pub fn for_kind(kind: ToolchainKind) -> Self {
        Self {
            kind,
            compiler_command: kind.default_compiler().to_string(),
            debugger_command: kind.default_debugger().to_string(),
        }
    }
}

impl Default for ToolchainSpec {
    fn default() -> Self {
        Self::for_kind(ToolchainKind::default())
    }
}

/// The `[cc]` table as written; omitted commands fall back to the kind's.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolchainDecl {
    #[serde(default)]
    kind: ToolchainKind,
    cmd: Option<String>,
    dbg: Option<String>,
}

impl From<ToolchainDecl> for ToolchainSpec {
    fn from(decl: ToolchainDecl) -> Self {
        Self {
            kind: decl.kind,
            compiler_command: decl
                .cmd
                .unwrap_or_else(|| decl.kind.default_compiler().to_string()),
            debugger_command: decl
                .dbg
                .unwrap_or_else(|| decl.kind.default_debugger().to_string()),
        }
    }
}
