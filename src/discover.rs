//! Script discovery under the script folder.

use crate::model::ScriptFile;
use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::{debug, warn};

/// Extension of the script files to document.
pub const SCRIPT_EXTENSION: &str = "ps1";

/// Recursively find scripts under `root`, skipping any whose immediate parent
/// directory name is listed in `exclude`.
///
/// Results are sorted so repeated runs see the same order.
pub fn discover(root: &Path, exclude: &[String]) -> Result<Vec<ScriptFile>> {
    if !root.is_dir() {
        bail!("script folder not found: {}", root.display());
    }

    let pattern = format!(
        "{}/**/*.{}",
        Pattern::escape(&root.to_string_lossy()),
        SCRIPT_EXTENSION
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut paths: Vec<_> = glob::glob_with(&pattern, options)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| match r {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("skipping {}: {}", e.path().display(), e.error());
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    paths.dedup();

    let mut files = Vec::new();
    for path in paths {
        let file = ScriptFile::new(&path);
        if exclude.iter().any(|name| *name == file.dir_name) {
            debug!("excluded {}", path.display());
            continue;
        }
        files.push(file);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# script\n").unwrap();
    }

    #[test]
    fn finds_scripts_recursively_in_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.ps1");
        touch(dir.path(), "a.ps1");
        touch(dir.path(), "Deploy/Install.ps1");
        touch(dir.path(), "Deploy/Nested/Deep.PS1");
        touch(dir.path(), "readme.md");

        let files = discover(dir.path(), &[]).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.base_name.as_str()).collect();
        assert_eq!(names, vec!["Install", "Deep", "a", "b"]);
        assert_eq!(files[1].dir_name, "Nested");
    }

    #[test]
    fn excludes_by_immediate_parent_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Archive/Old.ps1");
        touch(dir.path(), "Archive/Keep/Newer.ps1");
        touch(dir.path(), "Tools/Run.ps1");

        let exclude = vec!["Archive".to_string()];
        let files = discover(dir.path(), &exclude).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.base_name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Run"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_stop_discovery() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Locked/Hidden.ps1");
        touch(dir.path(), "Tools/Run.ps1");
        let locked = dir.path().join("Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let files = discover(dir.path(), &[]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = files.unwrap();
        assert!(files.iter().any(|f| f.base_name == "Run"));
    }

    #[test]
    fn missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let err = discover(&dir.path().join("nope"), &[]).unwrap_err();
        assert!(err.to_string().contains("script folder not found"));
    }
}
