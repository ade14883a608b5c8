//! Adaptor configuration stored in `toolinfo.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "toolinfo.toml";

/// Adaptor configuration (TOML).
///
/// Missing fields default to values that work without any config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolinfoConfig {
    pub locator: LocatorConfig,
    pub version: VersionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocatorConfig {
    /// Directories searched for tool executables before `PATH`.
    pub search_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VersionConfig {
    /// Wall-clock limit for `<tool> --version`.
    pub timeout_secs: u64,

    /// Discard version output beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            output_limit_bytes: 64 * 1024,
        }
    }
}

impl ToolinfoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version.timeout_secs == 0 {
            return Err(anyhow!("version.timeout_secs must be > 0"));
        }
        if self.version.output_limit_bytes == 0 {
            return Err(anyhow!("version.output_limit_bytes must be > 0"));
        }
        if self
            .locator
            .search_dirs
            .iter()
            .any(|dir| dir.as_os_str().is_empty())
        {
            return Err(anyhow!("locator.search_dirs must not contain empty paths"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ToolinfoConfig::default()`.
pub fn load_config(path: &Path) -> Result<ToolinfoConfig> {
    if !path.exists() {
        let cfg = ToolinfoConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ToolinfoConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
