//! Workspace synchronization.
//!
//! Rewrites the workspace manifest's membership list to match the discovered
//! module packages, then strips per-package owned overrides: once
//! workspace-level linking is active they are redundant and drift-prone.

use crate::core::Workspace;
use crate::linker::error::LinkError;
use crate::linker::link::remove_owned_overrides;
use crate::linker::modfile::{WorkFile, WORKSPACE_MANIFEST};
use crate::linker::ownership::Ownership;
use crate::util::fs;

/// Synchronize the workspace manifest with the module packages.
///
/// The workspace manifest must already exist; this never bootstraps one.
/// The teardown sweep across packages is sequential and fail-fast: packages
/// processed before a failure keep their torn-down state, and a re-run
/// converges because every step is idempotent.
pub fn sync_workspace(workspace: &Workspace) -> Result<(), LinkError> {
    let path = workspace.origin().join(WORKSPACE_MANIFEST);
    if !path.is_file() {
        return Err(LinkError::NotAWorkspace { path });
    }

    let mut work = WorkFile::read(&path)?;

    // full teardown of the owned membership block, any owned sub-kind
    for entry in work.use_entries()? {
        if entry.ownership.is_owned() {
            work.drop_use(&entry.dir);
        }
    }

    let mut dirs: Vec<String> = workspace
        .module_packages()
        .map(|pkg| {
            let rel = fs::relative_path(workspace.origin(), pkg.origin());
            if rel.as_os_str().is_empty() {
                ".".to_string()
            } else {
                rel.to_string_lossy().into_owned()
            }
        })
        .collect();
    dirs.sort();
    dirs.dedup();

    for dir in &dirs {
        work.add_use(dir, &Ownership::Direct);
    }

    work.cleanup();
    work.write()?;

    // per-package overrides are superseded by workspace-level resolution
    for pkg in workspace.module_packages() {
        remove_owned_overrides(pkg)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use tempfile::TempDir;

    use crate::core::manifest::PackageConfig;
    use crate::core::{Package, PackageKind};
    use crate::linker::modfile::MODULE_MANIFEST;

    fn write_module(root: &Path, dir: &str, content: &str) {
        let dir = root.join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODULE_MANIFEST), content).unwrap();
    }

    fn package(root: &Path, dir: &str, name: &str, kind: PackageKind) -> Package {
        let config = PackageConfig {
            name: name.to_string(),
            kind,
            deps: vec![],
            sources: vec!["**/*".to_string()],
        };
        Package::from_config(config, root.join(dir)).unwrap()
    }

    fn workspace(tmp: &TempDir) -> Workspace {
        let root = tmp.path();
        write_module(root, "pkgs/b", "[module]\nname = \"acme/b\"\n");
        write_module(
            root,
            "pkgs/a",
            "[module]\nname = \"acme/a\"\n\n[override]\n\"acme/b\" = { path = \"../b\" } # moorage\n",
        );

        Workspace::new(
            root.to_path_buf(),
            vec![
                package(root, "pkgs/b", "b", PackageKind::Module),
                package(root, "pkgs/a", "a", PackageKind::Module),
            ],
        )
        .unwrap()
    }

    fn read(root: &Path, rel: &str) -> String {
        std::fs::read_to_string(root.join(rel)).unwrap()
    }

    #[test]
    fn test_missing_workspace_manifest_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let ws = workspace(&tmp);
        let before = read(tmp.path(), "pkgs/a/Module.toml");

        let err = sync_workspace(&ws).unwrap_err();
        assert!(matches!(err, LinkError::NotAWorkspace { .. }));
        assert!(!tmp.path().join(WORKSPACE_MANIFEST).exists());
        assert_eq!(read(tmp.path(), "pkgs/a/Module.toml"), before);
    }

    #[test]
    fn test_sync_builds_sorted_owned_block() {
        let tmp = TempDir::new().unwrap();
        let ws = workspace(&tmp);
        std::fs::write(tmp.path().join(WORKSPACE_MANIFEST), "").unwrap();

        sync_workspace(&ws).unwrap();

        let content = read(tmp.path(), WORKSPACE_MANIFEST);
        let a = content.find("\"pkgs/a\" = true # moorage").unwrap();
        let b = content.find("\"pkgs/b\" = true # moorage").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_sync_replaces_stale_owned_members_keeps_foreign() {
        let tmp = TempDir::new().unwrap();
        let ws = workspace(&tmp);
        std::fs::write(
            tmp.path().join(WORKSPACE_MANIFEST),
            "[use]\n\"pkgs/gone\" = true # moorage\n\"vendor/fork\" = true\n",
        )
        .unwrap();

        sync_workspace(&ws).unwrap();

        let content = read(tmp.path(), WORKSPACE_MANIFEST);
        assert!(!content.contains("pkgs/gone"));
        assert!(content.contains("\"vendor/fork\" = true\n"));
        assert!(content.contains("\"pkgs/a\" = true # moorage"));
        assert!(content.contains("\"pkgs/b\" = true # moorage"));
    }

    #[test]
    fn test_sync_tears_down_package_overrides() {
        let tmp = TempDir::new().unwrap();
        let ws = workspace(&tmp);
        std::fs::write(tmp.path().join(WORKSPACE_MANIFEST), "").unwrap();

        sync_workspace(&ws).unwrap();

        let content = read(tmp.path(), "pkgs/a/Module.toml");
        assert!(!content.contains("[override]"));
        assert!(!content.contains("moorage"));
    }

    #[test]
    fn test_sync_skips_generic_packages() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_module(root, "pkgs/a", "[module]\nname = \"acme/a\"\n");
        std::fs::create_dir_all(root.join("tools/gen")).unwrap();

        let ws = Workspace::new(
            root.to_path_buf(),
            vec![
                package(root, "pkgs/a", "a", PackageKind::Module),
                package(root, "tools/gen", "gen", PackageKind::Generic),
            ],
        )
        .unwrap();
        std::fs::write(root.join(WORKSPACE_MANIFEST), "").unwrap();

        sync_workspace(&ws).unwrap();

        let content = read(root, WORKSPACE_MANIFEST);
        assert!(content.contains("pkgs/a"));
        assert!(!content.contains("tools/gen"));
    }

    #[test]
    fn test_sync_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let ws = workspace(&tmp);
        std::fs::write(
            tmp.path().join(WORKSPACE_MANIFEST),
            "[use]\n\"vendor/fork\" = true\n",
        )
        .unwrap();

        sync_workspace(&ws).unwrap();
        let first_work = read(tmp.path(), WORKSPACE_MANIFEST);
        let first_mod = read(tmp.path(), "pkgs/a/Module.toml");

        sync_workspace(&ws).unwrap();
        assert_eq!(read(tmp.path(), WORKSPACE_MANIFEST), first_work);
        assert_eq!(read(tmp.path(), "pkgs/a/Module.toml"), first_mod);
    }
}
