//! Lexical path arithmetic for building tool command lines.

use std::path::{Component, Path, PathBuf};

/// Express `path` relative to `start`, resolving relative inputs against `cwd`.
///
/// Purely lexical: `.` components are dropped and `..` pops the previous
/// component, symlinks are not followed. Identical paths yield `.`.
pub fn relative_path(path: &Path, start: &Path, cwd: &Path) -> PathBuf {
    let absolute_path = cwd.join(path);
    let absolute_start = cwd.join(start);
    let target = normalize(&absolute_path);
    let base = normalize(&absolute_start);

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(left, right)| left == right)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component);
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// Parent directory of an executable, `.` when it has none.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if components.is_empty() {
                    components.push(component);
                }
            }
            other => components.push(other),
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(path: &str, start: &str, cwd: &str) -> PathBuf {
        relative_path(Path::new(path), Path::new(start), Path::new(cwd))
    }

    #[test]
    fn sibling_directories() {
        assert_eq!(
            rel("/opt/blast/pblast.opt", "/home/bench", "/"),
            PathBuf::from("../../opt/blast/pblast.opt")
        );
    }

    #[test]
    fn path_inside_start() {
        assert_eq!(rel("/work/tools/esbmc", "/work", "/"), PathBuf::from("tools/esbmc"));
    }

    #[test]
    fn relative_inputs_resolve_against_cwd() {
        assert_eq!(
            rel("programs/a.c", "/opt/esbmc/bin", "/home/bench"),
            PathBuf::from("../../../home/bench/programs/a.c")
        );
        assert_eq!(rel("/home/bench/bin", ".", "/home/bench"), PathBuf::from("bin"));
    }

    #[test]
    fn identical_paths_yield_dot() {
        assert_eq!(rel("/opt/tool", "/opt/tool/", "/"), PathBuf::from("."));
        assert_eq!(rel(".", ".", "/anywhere"), PathBuf::from("."));
    }

    #[test]
    fn dot_dot_components_are_collapsed() {
        assert_eq!(
            rel("/opt/x/../blast/bin/tool", "/opt/blast/./lib", "/"),
            PathBuf::from("../bin/tool")
        );
    }

    #[test]
    fn parent_dir_of_bare_name_is_dot() {
        assert_eq!(parent_dir(Path::new("esbmc")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("/opt/esbmc/esbmc")), PathBuf::from("/opt/esbmc"));
    }
}
