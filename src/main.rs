//! mek-resolve CLI
//!
//! Loads a project manifest, resolves it for the selected build mode and
//! prints the result. Nothing is compiled.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use mek_resolve::{BuildContext, Loader};

#[derive(Parser)]
#[command(name = "mek-resolve")]
#[command(about = "Resolve a C/C++ project manifest into a build configuration", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration as TOML
    Resolve {
        #[command(flatten)]
        manifest: ManifestArgs,
    },

    /// Print the compiler invocation for the resolved configuration
    Command {
        #[command(flatten)]
        manifest: ManifestArgs,
    },
}

#[derive(Args)]
struct ManifestArgs {
    /// Path to the project manifest
    #[arg(long, short = 'f', default_value = "mek.toml")]
    file: PathBuf,

    /// Optional local override manifest
    #[arg(long, default_value = "mek.local.toml")]
    local: PathBuf,

    /// Build in release mode (-O) instead of debug (-g)
    #[arg(long, env = "MEK_RELEASE")]
    release: bool,
}

impl ManifestArgs {
    fn context(&self) -> Result<BuildContext, mek_resolve::Error> {
        let loader = Loader::builder()
            .with_manifest(&self.file, true)
            .with_manifest(&self.local, false)
            .with_env("MEK", "__");

        BuildContext::builder()
            .with_loader(loader)?
            .with_release(self.release)
            .build()
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<String, String> {
    match command {
        Commands::Resolve { manifest } => {
            let ctx = manifest.context().map_err(|e| e.to_string())?;
            toml::to_string(ctx.resolved()).map_err(|e| e.to_string())
        }
        Commands::Command { manifest } => {
            let ctx = manifest.context().map_err(|e| e.to_string())?;
            let resolved = ctx.resolved();
            let mut line = vec![resolved.compiler().to_string()];
            line.extend(resolved.compile_args());
            Ok(line.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;
    use tempfile::TempDir;

    const RAY_TRACING: &str = r#"
name = "ray_tracing"
main = "main.cpp"
libs = ["m"]
flags = ["-std=c++11", "-Wall"]

[cc]
cmd = "g++"
dbg = "gdb"
"#;

    fn project_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mek.toml"), RAY_TRACING).unwrap();
        dir
    }

    fn parse(subcommand: &str, dir: &Path, extra: &[&str]) -> Commands {
        let file = dir.join("mek.toml");
        let local = dir.join("mek.local.toml");
        let mut args = vec![
            "mek-resolve".to_string(),
            subcommand.to_string(),
            "-f".to_string(),
            file.display().to_string(),
            "--local".to_string(),
            local.display().to_string(),
        ];
        args.extend(extra.iter().map(|a| a.to_string()));
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_command_line_release() {
        let dir = project_dir();
        let output = run(parse("command", dir.path(), &["--release"])).unwrap();

        assert_eq!(output, "g++ -std=c++11 -Wall -O main.cpp -o ray_tracing -lm");
    }

    #[test]
    fn test_command_line_debug_by_default() {
        let dir = project_dir();
        let output = run(parse("command", dir.path(), &[])).unwrap();

        assert_eq!(output, "g++ -std=c++11 -Wall -g main.cpp -o ray_tracing -lm");
    }

    #[test]
    fn test_local_override_applies() {
        let dir = project_dir();
        std::fs::write(dir.path().join("mek.local.toml"), "[cc]\ncmd = \"clang++\"\n").unwrap();

        let output = run(parse("command", dir.path(), &[])).unwrap();
        assert!(output.starts_with("clang++ "));
    }

    #[test]
    fn test_resolve_prints_toml() {
        let dir = project_dir();
        let output = run(parse("resolve", dir.path(), &["--release"])).unwrap();
        let table: toml::Table = toml::from_str(&output).unwrap();

        assert_eq!(table["mode"].as_str(), Some("release"));
        assert_eq!(table["main"].as_str(), Some("main.cpp"));
        let flags: Vec<&str> = table["flags"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f.as_str())
            .collect();
        assert_eq!(flags, ["-std=c++11", "-Wall", "-O"]);
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let message = run(parse("resolve", dir.path(), &[])).unwrap_err();

        assert!(message.contains("not found"), "{message}");
    }

    #[test]
    fn test_invalid_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mek.toml"), "name = \"x\"\nmain = \"\"\n").unwrap();

        let message = run(parse("command", dir.path(), &[])).unwrap_err();
        assert!(message.contains("`main`"), "{message}");
    }

    #[test]
    fn test_release_reads_env() {
        let cli = Cli::command();
        for name in ["resolve", "command"] {
            let release = cli
                .find_subcommand(name)
                .and_then(|sub| sub.get_arguments().find(|a| a.get_id() == "release"))
                .unwrap();
            assert_eq!(release.get_env(), Some(std::ffi::OsStr::new("MEK_RELEASE")));
        }
    }

    #[test]
    fn test_default_manifest_paths() {
        let Commands::Resolve { manifest } = Cli::try_parse_from(["mek-resolve", "resolve"]).unwrap().command
        else {
            panic!("expected resolve");
        };
        assert_eq!(manifest.file, PathBuf::from("mek.toml"));
        assert_eq!(manifest.local, PathBuf::from("mek.local.toml"));
    }
}
