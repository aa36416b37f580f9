//! Workspace - member discovery and dependency closures.
//!
//! A Workspace is the set of packages found under the root `Moorage.toml`'s
//! member globs, plus the origin directory shared state (the workspace
//! manifest) hangs off of.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{Manifest, MANIFEST_NAME};
use crate::core::package::Package;
use crate::util::fs;

/// A workspace: the root directory and its member packages.
#[derive(Debug)]
pub struct Workspace {
    /// Workspace root directory
    origin: PathBuf,

    /// Member packages, in discovery order
    packages: Vec<Package>,
}

impl Workspace {
    /// Create a workspace from already-loaded packages.
    pub fn new(origin: PathBuf, packages: Vec<Package>) -> Result<Self> {
        let ws = Workspace { origin, packages };
        ws.validate()?;
        Ok(ws)
    }

    /// Discover a workspace from its root directory.
    ///
    /// Reads the root `Moorage.toml`, expands member globs, and loads each
    /// member directory containing a package manifest.
    pub fn discover(root: &Path) -> Result<Self> {
        let manifest = Manifest::load(&root.join(MANIFEST_NAME))?;
        let config = manifest
            .workspace
            .ok_or_else(|| anyhow::anyhow!("{} is not a workspace root", root.display()))?;

        let exclude: Vec<glob::Pattern> = config
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).with_context(|| format!("invalid exclude pattern: {}", p))
            })
            .collect::<Result<_>>()?;

        let mut packages = Vec::new();
        for dir in fs::glob_dirs(root, &config.members)? {
            let rel = fs::relative_path(root, &dir);
            if exclude.iter().any(|p| p.matches_path(&rel)) {
                continue;
            }

            let member_manifest = dir.join(MANIFEST_NAME);
            if !member_manifest.is_file() {
                continue;
            }

            let manifest = Manifest::load(&member_manifest)?;
            let Some(pkg_config) = manifest.package else {
                continue;
            };
            packages.push(Package::from_config(pkg_config, dir)?);
        }

        Self::new(root.to_path_buf(), packages)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pkg in &self.packages {
            if !seen.insert(pkg.name()) {
                anyhow::bail!("duplicate package name in workspace: `{}`", pkg.name());
            }
        }
        for pkg in &self.packages {
            for dep in pkg.deps() {
                if self.package(dep).is_none() {
                    anyhow::bail!(
                        "package `{}` depends on `{}`, which is not a workspace member",
                        pkg.name(),
                        dep
                    );
                }
            }
        }
        Ok(())
    }

    /// Get the workspace root directory.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Get all member packages.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Get a package by name.
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name() == name)
    }

    /// Iterate over module packages only.
    pub fn module_packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter().filter(|p| p.is_module())
    }

    /// Compute the transitive dependency closure of a package.
    ///
    /// The declared dependency graph is assumed acyclic; the traversal
    /// terminates regardless, but cycles are a configuration error upstream.
    /// The target itself is not part of its own closure.
    pub fn transitive_dependencies(&self, pkg: &Package) -> Vec<&Package> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(pkg.name());

        let mut queue: Vec<&str> = pkg.deps().iter().map(String::as_str).collect();
        let mut closure = Vec::new();

        while let Some(name) = queue.pop() {
            if !visited.insert(name) {
                continue;
            }
            if let Some(dep) = self.package(name) {
                closure.push(dep);
                queue.extend(dep.deps().iter().map(String::as_str));
            }
        }

        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_package(root: &Path, name: &str, deps: &[&str]) {
        let dir = root.join("pkgs").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let deps = deps
            .iter()
            .map(|d| format!("\"{}\"", d))
            .collect::<Vec<_>>()
            .join(", ");
        std::fs::write(
            dir.join(MANIFEST_NAME),
            format!("[package]\nname = \"{}\"\ndeps = [{}]\n", name, deps),
        )
        .unwrap();
    }

    fn write_workspace(root: &Path) {
        std::fs::write(
            root.join(MANIFEST_NAME),
            "[workspace]\nmembers = [\"pkgs/*\"]\n",
        )
        .unwrap();
    }

    #[test]
    fn test_discover() {
        let tmp = TempDir::new().unwrap();
        write_workspace(tmp.path());
        write_package(tmp.path(), "a", &[]);
        write_package(tmp.path(), "b", &["a"]);

        let ws = Workspace::discover(tmp.path()).unwrap();
        assert_eq!(ws.packages().len(), 2);
        assert!(ws.package("a").is_some());
        assert!(ws.package("b").is_some());
        assert!(ws.package("c").is_none());
    }

    #[test]
    fn test_discover_rejects_unknown_dep() {
        let tmp = TempDir::new().unwrap();
        write_workspace(tmp.path());
        write_package(tmp.path(), "a", &["ghost"]);

        let err = Workspace::discover(tmp.path()).unwrap_err().to_string();
        assert!(err.contains("ghost"));
    }

    #[test]
    fn test_discover_honors_exclude() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(MANIFEST_NAME),
            "[workspace]\nmembers = [\"pkgs/*\"]\nexclude = [\"pkgs/b\"]\n",
        )
        .unwrap();
        write_package(tmp.path(), "a", &[]);
        write_package(tmp.path(), "b", &[]);

        let ws = Workspace::discover(tmp.path()).unwrap();
        assert_eq!(ws.packages().len(), 1);
        assert!(ws.package("b").is_none());
    }

    #[test]
    fn test_transitive_dependencies() {
        let tmp = TempDir::new().unwrap();
        write_workspace(tmp.path());
        write_package(tmp.path(), "a", &[]);
        write_package(tmp.path(), "b", &["a"]);
        write_package(tmp.path(), "c", &["b"]);

        let ws = Workspace::discover(tmp.path()).unwrap();
        let c = ws.package("c").unwrap();

        let mut names: Vec<&str> = ws
            .transitive_dependencies(c)
            .iter()
            .map(|p| p.name())
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_closure_excludes_target() {
        let tmp = TempDir::new().unwrap();
        write_workspace(tmp.path());
        write_package(tmp.path(), "a", &[]);

        let ws = Workspace::discover(tmp.path()).unwrap();
        let a = ws.package("a").unwrap();
        assert!(ws.transitive_dependencies(a).is_empty());
    }
}
