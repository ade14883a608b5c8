//! Per-invocation value types shared by the adaptors.
//!
//! These types carry no behavior that touches the outside world; they are
//! built by the caller and consumed once.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Signal number the harness uses to kill a run that exceeded its limits.
pub const KILL_SIGNAL: i32 = 9;

/// Observable outcome of one tool process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Exit code, absent when the process was killed by a signal.
    pub returncode: Option<i32>,
    /// Signal that terminated the process, if any.
    pub signal: Option<i32>,
    /// Captured output, one entry per line, without line terminators.
    pub output: Vec<String>,
    /// Whether the harness stopped the run because a time limit was hit.
    pub timed_out: bool,
}

impl RunResult {
    /// Build a result for a process that exited normally.
    pub fn exited<I, S>(returncode: i32, output: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            returncode: Some(returncode),
            output: output.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_signal(mut self, signal: i32) -> Self {
        self.signal = Some(signal);
        self.returncode = None;
        self
    }

    pub fn with_timeout(mut self) -> Self {
        self.timed_out = true;
        self
    }

    /// Output lines joined with `\n` (no trailing terminator added).
    pub fn joined_output(&self) -> String {
        self.output.join("\n")
    }
}

/// Resource limits the harness enforces. Adaptors pass them through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub cpu_time_secs: Option<u64>,
    pub wall_time_secs: Option<u64>,
    pub memory_bytes: Option<u64>,
    pub cores: Option<u32>,
}

/// Inputs for building a tool command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdlineRequest {
    /// Extra tool options, in order.
    pub options: Vec<String>,
    /// Input programs. Relative paths are relative to the caller's directory.
    pub sourcefiles: Vec<PathBuf>,
    /// Property specification file; some tools ignore it.
    pub propertyfile: Option<PathBuf>,
    pub rlimits: ResourceLimits,
}

/// Environment variables to extend before launching a tool.
///
/// Each value is appended to whatever the variable already holds in the
/// harness environment (for `PATH` the value starts with `:`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub additional: BTreeMap<String, String>,
}

impl Environment {
    pub fn with_additional(mut self, name: &str, value: impl Into<String>) -> Self {
        self.additional.insert(name.to_string(), value.into());
        self
    }

    /// Value `name` should have in the child given its `inherited` value.
    ///
    /// Returns `None` when this environment does not touch `name`.
    pub fn apply(&self, name: &str, inherited: Option<&str>) -> Option<String> {
        let extra = self.additional.get(name)?;
        Some(format!("{}{}", inherited.unwrap_or_default(), extra))
    }
}
