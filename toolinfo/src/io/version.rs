//! Querying a tool for its version string.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{debug, instrument};

use crate::io::config::VersionConfig;
use crate::io::process::run_command_with_timeout;

/// Flag passed to a tool to make it print its version.
pub const VERSION_FLAG: &str = "--version";

/// Runs a tool with a flag and returns what it printed.
pub trait VersionProbe: Send + Sync {
    /// Standard output of `executable flag`, with surrounding whitespace removed.
    fn probe(&self, executable: &Path, flag: &str) -> Result<String>;
}

/// Probe that spawns the tool as a child process.
#[derive(Debug, Clone)]
pub struct ProcessVersionProbe {
    timeout: Duration,
    output_limit_bytes: usize,
}

impl ProcessVersionProbe {
    pub fn new(config: &VersionConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            output_limit_bytes: config.output_limit_bytes,
        }
    }
}

impl VersionProbe for ProcessVersionProbe {
    #[instrument(skip(self), fields(executable = %executable.display()))]
    fn probe(&self, executable: &Path, flag: &str) -> Result<String> {
        let mut cmd = Command::new(executable);
        cmd.arg(flag);
        let output = run_command_with_timeout(cmd, self.timeout, self.output_limit_bytes)?;
        if output.timed_out {
            bail!("{} {} timed out after {:?}", executable.display(), flag, self.timeout);
        }
        let version = output.stdout_text().trim().to_string();
        if !output.status.success() && version.is_empty() {
            bail!(
                "{} {} exited with {}: {}",
                executable.display(),
                flag,
                output.status,
                output.stderr_text().trim()
            );
        }
        debug!(version = %version, "probed version");
        Ok(version)
    }
}

/// Characters `start..end` of `text`, clamped to its length.
pub fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_slice_clamps() {
        assert_eq!(char_slice("BLAST 2.7.3 (linux)", 6, 11), "2.7.3");
        assert_eq!(char_slice("BLAST 2.7", 6, 11), "2.7");
        assert_eq!(char_slice("BLAST", 6, 11), "");
        assert_eq!(char_slice("abc", 2, 1), "");
    }

    #[cfg(unix)]
    #[test]
    fn probe_trims_stdout() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let script = temp.path().join("fake-tool");
        fs::write(&script, "#!/bin/sh\necho \"  tool $1  \"\n").expect("write");
        let mut perms = fs::metadata(&script).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("chmod");

        let probe = ProcessVersionProbe::new(&VersionConfig::default());
        let version = probe.probe(&script, VERSION_FLAG).expect("probe");
        assert_eq!(version, "tool --version");
    }

    #[cfg(unix)]
    #[test]
    fn failing_version_query_reports_stderr() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let script = temp.path().join("broken-tool");
        fs::write(&script, "#!/bin/sh\necho \"unknown option $1\" >&2\nexit 1\n").expect("write");
        let mut perms = fs::metadata(&script).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("chmod");

        let probe = ProcessVersionProbe::new(&VersionConfig::default());
        let err = probe.probe(&script, VERSION_FLAG).expect_err("should fail");
        assert!(
            err.to_string().contains("unknown option --version"),
            "unexpected error: {err}"
        );
    }
}
