//! Tool adaptors: one [`Tool`] implementation per supported verifier.
//!
//! An adaptor knows how to find its verifier, how to launch it and how to
//! read its output. It holds no per-run state; everything it needs from the
//! outside world comes in through a [`ToolContext`].

pub mod blast;
pub mod esbmc;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::core::path::{parent_dir, relative_path};
use crate::core::types::{CmdlineRequest, Environment, RunResult};
use crate::core::verdict::Verdict;
use crate::error::ToolError;
use crate::io::config::ToolinfoConfig;
use crate::io::locator::{Locator, SearchPathLocator};
use crate::io::version::{ProcessVersionProbe, VersionProbe};

/// Identifier of a supported verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    Blast,
    Esbmc,
}

impl ToolId {
    pub const ALL: [ToolId; 2] = [ToolId::Blast, ToolId::Esbmc];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Blast => "blast",
            ToolId::Esbmc => "esbmc",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collaborators shared by all adaptors.
#[derive(Clone)]
pub struct ToolContext {
    pub locator: Arc<dyn Locator>,
    pub probe: Arc<dyn VersionProbe>,
    /// Directory the harness launches tools from; relative paths resolve here.
    pub cwd: PathBuf,
}

impl ToolContext {
    pub fn new(locator: Arc<dyn Locator>, probe: Arc<dyn VersionProbe>, cwd: PathBuf) -> Self {
        Self {
            locator,
            probe,
            cwd,
        }
    }

    /// Context backed by the real search path and process spawning.
    pub fn from_config(config: &ToolinfoConfig, cwd: PathBuf) -> Self {
        let locator = SearchPathLocator::new(config.locator.search_dirs.clone(), cwd.clone());
        let probe = ProcessVersionProbe::new(&config.version);
        Self::new(Arc::new(locator), Arc::new(probe), cwd)
    }

    /// `path` relative to `working_dir`, as a command-line argument.
    pub fn relative_arg(&self, path: &Path, working_dir: &Path) -> Result<String, ToolError> {
        path_arg(&relative_path(path, working_dir, &self.cwd))
    }
}

/// Capability set the harness uses to drive one verifier.
pub trait Tool: Send + Sync {
    fn id(&self) -> ToolId;

    /// Human-readable tool name.
    fn name(&self) -> &'static str;

    /// Absolute path of the verifier executable.
    fn executable(&self) -> Result<PathBuf, ToolError>;

    /// Files that must be staged next to the executable to run it elsewhere.
    fn program_files(&self, executable: &Path) -> Vec<PathBuf> {
        vec![parent_dir(executable)]
    }

    fn working_directory(&self, executable: &Path) -> PathBuf;

    /// Environment extensions the tool needs; empty by default.
    fn environment(&self, _executable: &Path) -> Environment {
        Environment::default()
    }

    fn version(&self, executable: &Path) -> Result<String, ToolError>;

    /// Argument vector for one run, paths relative to the working directory.
    fn cmdline(
        &self,
        executable: &Path,
        request: &CmdlineRequest,
    ) -> Result<Vec<String>, ToolError>;

    /// Classify a finished run. Never fails.
    fn determine_result(&self, run: &RunResult) -> Verdict;
}

/// Everything the harness needs to know about an installed verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub name: String,
    pub executable: PathBuf,
    pub version: String,
    pub working_directory: PathBuf,
    pub environment: Environment,
    pub program_files: Vec<PathBuf>,
}

/// Resolve `tool` and snapshot its static properties.
#[instrument(skip_all, fields(tool = %tool.id()))]
pub fn describe(tool: &dyn Tool) -> Result<ToolDescriptor, ToolError> {
    let executable = tool.executable()?;
    let version = tool.version(&executable)?;
    debug!(executable = %executable.display(), version = %version, "tool resolved");
    Ok(ToolDescriptor {
        id: tool.id(),
        name: tool.name().to_string(),
        working_directory: tool.working_directory(&executable),
        environment: tool.environment(&executable),
        program_files: tool.program_files(&executable),
        version,
        executable,
    })
}

/// `path` as a command-line argument. Paths that are not valid UTF-8 are refused.
pub(crate) fn path_arg(path: &Path) -> Result<String, ToolError> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        ToolError::Precondition(format!("path {} is not valid UTF-8", path.display()))
    })
}
