//! Filesystem utilities.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Find files matching glob patterns relative to a base directory.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Find directories matching glob patterns relative to a base directory.
pub fn glob_dirs(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_dir() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("Module.toml"), "[module]\nname = \"a\"\n").unwrap();
        fs::write(pkg.join("notes.txt"), "notes").unwrap();

        let files = glob_files(tmp.path(), &["pkg/**/*.toml".to_string()]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Module.toml"));
    }

    #[test]
    fn test_glob_dirs_skips_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pkgs/frobs")).unwrap();
        fs::create_dir_all(tmp.path().join("pkgs/widgets")).unwrap();
        fs::write(tmp.path().join("pkgs/readme.md"), "hi").unwrap();

        let dirs = glob_dirs(tmp.path(), &["pkgs/*".to_string()]).unwrap();
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn test_relative_path() {
        let rel = relative_path(Path::new("/ws/pkgs/app"), Path::new("/ws/pkgs/lib"));
        assert_eq!(rel, PathBuf::from("../lib"));
    }
}
