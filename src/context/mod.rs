//! Build context: a loaded project resolved for one build mode.

use log::info;

use crate::config::Loader;
use crate::project::{BuildMode, ProjectConfig, ResolvedConfig};
use crate::Error;

/// A project together with its resolution for a single [`BuildMode`].
///
/// Resolution happens once in [`BuildContextBuilder::build`]; afterwards the
/// context is read-only.
///
/// ## Example
///
/// ```no_run
/// use mek_resolve::{BuildContext, BuildMode, Loader};
///
/// let ctx = BuildContext::builder()
///     .with_loader(Loader::builder().with_manifest("mek.toml", true))?
///     .with_mode(BuildMode::Release)
///     .build()?;
///
/// println!("{} {}", ctx.resolved().compiler(), ctx.resolved().compile_args().join(" "));
/// # Ok::<(), mek_resolve::Error>(())
/// ```
///
/// A builder without a project has no `build`:
///
/// ```compile_fail
/// use mek_resolve::{BuildContext, BuildMode};
///
/// let ctx = BuildContext::builder().with_mode(BuildMode::Release).build();
/// ```
#[derive(Debug, Clone)]
pub struct BuildContext {
    project: ProjectConfig,
    resolved: ResolvedConfig,
}

impl BuildContext {
    /// Creates a new builder for constructing a `BuildContext`.
    pub fn builder() -> BuildContextBuilder<()> {
        BuildContextBuilder {
            project: (),
            mode: BuildMode::default(),
        }
    }

    /// The project as declared, before mode flags were applied.
    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn resolved(&self) -> &ResolvedConfig {
        &self.resolved
    }

    pub fn mode(&self) -> BuildMode {
        self.resolved.mode()
    }
}

/// Builder for a [`BuildContext`].
///
/// Starts as `BuildContextBuilder<()>` and becomes
/// `BuildContextBuilder<ProjectConfig>` once a project is attached; only the
/// latter can [`build`](BuildContextBuilder::build). The mode defaults to
/// [`BuildMode::Debug`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct BuildContextBuilder<P> {
    project: P,
    mode: BuildMode,
}

impl BuildContextBuilder<()> {
    pub fn with_project(self, project: ProjectConfig) -> BuildContextBuilder<ProjectConfig> {
        BuildContextBuilder {
            project,
            mode: self.mode,
        }
    }

    /// Loads the project from `loader` right away.
    pub fn with_loader(self, loader: Loader) -> Result<BuildContextBuilder<ProjectConfig>, Error> {
        let project = loader.build::<ProjectConfig>()?;
        Ok(self.with_project(project))
    }
}

impl<P> BuildContextBuilder<P> {
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the mode from the boolean `release` option.
    pub fn with_release(self, release: bool) -> Self {
        self.with_mode(BuildMode::from_release(release))
    }
}

impl BuildContextBuilder<ProjectConfig> {
    /// Resolves the project for the selected mode.
    pub fn build(self) -> Result<BuildContext, Error> {
        let resolved = self.project.resolve(self.mode)?;
        info!("project '{}' ready for a {} build", self.project.name, self.mode);
        Ok(BuildContext {
            project: self.project,
            resolved,
        })
    }
}
