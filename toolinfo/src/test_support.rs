//! Test-only collaborators for driving adaptors without real tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::error::ToolError;
use crate::io::locator::Locator;
use crate::io::version::VersionProbe;
use crate::tools::ToolContext;

/// Locator backed by a fixed name -> path table.
#[derive(Debug, Clone, Default)]
pub struct FakeLocator {
    entries: BTreeMap<String, PathBuf>,
}

impl FakeLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(name.to_string(), path.into());
        self
    }
}

impl Locator for FakeLocator {
    fn find_executable(&self, name: &str) -> Result<PathBuf, ToolError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::not_found(name))
    }
}

/// Version probe that answers from a fixed executable -> output table.
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    outputs: BTreeMap<PathBuf, String>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, executable: impl Into<PathBuf>, output: &str) -> Self {
        self.outputs.insert(executable.into(), output.to_string());
        self
    }
}

impl VersionProbe for FakeProbe {
    fn probe(&self, executable: &Path, _flag: &str) -> Result<String> {
        self.outputs
            .get(executable)
            .map(|output| output.trim().to_string())
            .ok_or_else(|| anyhow!("no scripted version for {}", executable.display()))
    }
}

/// Context over the given fakes, launching from `cwd`.
pub fn context(locator: FakeLocator, probe: FakeProbe, cwd: &str) -> ToolContext {
    ToolContext::new(Arc::new(locator), Arc::new(probe), PathBuf::from(cwd))
}

/// Captured tool output written to a scratch directory.
pub struct OutputFile {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl OutputFile {
    pub fn new(lines: &[&str]) -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let path = dir.path().join("output.log");
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
