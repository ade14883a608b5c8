//! Executable lookup on a search path.
//!
//! The [`Locator`] trait lets adaptors resolve binaries without reading
//! global state; tests substitute a scripted locator.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::error::ToolError;

/// Resolves a binary name to the path of an executable file.
pub trait Locator: Send + Sync {
    fn find_executable(&self, name: &str) -> Result<PathBuf, ToolError>;
}

/// Searches configured directories first, then `PATH`.
#[derive(Debug, Clone)]
pub struct SearchPathLocator {
    search_dirs: Vec<PathBuf>,
    path_var: Option<OsString>,
    cwd: PathBuf,
}

impl SearchPathLocator {
    /// Locator over `search_dirs` followed by the process `PATH`.
    ///
    /// Relative search directories resolve against `cwd`.
    pub fn new(search_dirs: Vec<PathBuf>, cwd: PathBuf) -> Self {
        Self {
            search_dirs: search_dirs.iter().map(|dir| cwd.join(dir)).collect(),
            path_var: env::var_os("PATH"),
            cwd,
        }
    }

    /// Locator with an explicit `PATH` value instead of the process one.
    pub fn with_path_var(mut self, path_var: Option<OsString>) -> Self {
        self.path_var = path_var;
        self
    }

    fn search_path(&self) -> Option<OsString> {
        let mut dirs: Vec<PathBuf> = self.search_dirs.clone();
        if let Some(path_var) = &self.path_var {
            dirs.extend(env::split_paths(path_var));
        }
        if dirs.is_empty() {
            return None;
        }
        env::join_paths(dirs).ok()
    }

    fn absolute(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }
}

impl Locator for SearchPathLocator {
    #[instrument(skip(self))]
    fn find_executable(&self, name: &str) -> Result<PathBuf, ToolError> {
        let Some(search_path) = self.search_path() else {
            debug!("search path is empty");
            return Err(ToolError::not_found(name));
        };
        match which::which_in(name, Some(search_path), &self.cwd) {
            Ok(found) => {
                let found = self.absolute(found);
                debug!(path = %found.display(), "executable found");
                Ok(found)
            }
            Err(err) => {
                debug!(err = %err, "executable lookup failed");
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").expect("write");
        let mut perms = fs::metadata(path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).expect("chmod");
    }

    #[cfg(unix)]
    #[test]
    fn finds_executable_in_search_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let tool = temp.path().join("esbmc");
        make_executable(&tool);

        let locator = SearchPathLocator::new(vec![temp.path().to_path_buf()], temp.path().into())
            .with_path_var(None);
        let found = locator.find_executable("esbmc").expect("found");
        assert_eq!(found, tool);
    }

    #[test]
    fn missing_executable_is_lookup_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let locator = SearchPathLocator::new(vec![temp.path().to_path_buf()], temp.path().into())
            .with_path_var(None);
        let err = locator.find_executable("pblast.opt").unwrap_err();
        assert!(matches!(err, ToolError::ExecutableNotFound { ref name } if name == "pblast.opt"));
    }

    #[test]
    fn empty_search_path_is_lookup_error() {
        let locator = SearchPathLocator::new(Vec::new(), PathBuf::from("/")).with_path_var(None);
        assert!(locator.find_executable("esbmc").is_err());
    }
}
