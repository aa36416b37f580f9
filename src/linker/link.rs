//! Module linking.
//!
//! Rewrites per-package module manifests so that workspace dependencies
//! resolve against working-tree sources. Owned entries are fully replaced on
//! every run rather than diffed, which is what makes the operation
//! idempotent: the manifest converges to the same bytes no matter how many
//! times it is linked.

use crate::core::{Package, Workspace};
use crate::linker::collect::{collect_overrides, find_module_manifest, RegistryEntry};
use crate::linker::error::LinkError;
use crate::linker::modfile::{ModuleFile, ModuleRef, OverrideEntry};
use crate::linker::ownership::Ownership;
use crate::util::fs;

/// Link one package, or every module package when `target` is None.
///
/// The registry is snapshotted once up front and only read afterwards, so
/// every package in the batch is linked against the same consistent view of
/// foreign overrides even though manifests are rewritten one file at a time.
pub fn link_modules(workspace: &Workspace, target: Option<&Package>) -> Result<(), LinkError> {
    let registry = collect_overrides(workspace)?;

    for pkg in workspace.module_packages() {
        if let Some(target) = target {
            if target.name() != pkg.name() {
                continue;
            }
        }

        let mut deps: Vec<&RegistryEntry> = Vec::new();
        for dep in workspace.transitive_dependencies(pkg) {
            if !dep.is_module() {
                continue;
            }

            match registry.get(dep.name()) {
                Some(entry) => deps.push(entry),
                None => tracing::warn!(
                    dep = dep.name(),
                    "did not find a Module.toml for this package - linking will probably be broken"
                ),
            }
        }

        // deterministic output regardless of closure traversal order
        deps.sort_by(|a, b| a.module.cmp(&b.module));

        link_module(pkg, &deps)?;
    }

    Ok(())
}

/// Strip owned overrides from a package's module manifest.
///
/// Ignore-marked entries persist. This is the teardown the workspace
/// synchronizer runs once workspace-level linking supersedes per-package
/// overrides.
pub fn remove_owned_overrides(pkg: &Package) -> Result<(), LinkError> {
    let Some(manifest_path) = find_module_manifest(pkg) else {
        return Err(LinkError::ManifestNotFound {
            package: pkg.name().to_string(),
        });
    };

    let mut file = ModuleFile::read(manifest_path)?;
    drop_owned_overrides(&mut file)?;
    file.cleanup();
    file.write()
}

fn link_module(pkg: &Package, deps: &[&RegistryEntry]) -> Result<(), LinkError> {
    let Some(manifest_path) = find_module_manifest(pkg) else {
        return Err(LinkError::ManifestNotFound {
            package: pkg.name().to_string(),
        });
    };

    // Teardown and rebuild happen on one in-memory document; nothing is
    // written until every conflict check has passed, so a failed link leaves
    // the on-disk file untouched.
    let mut file = ModuleFile::read(manifest_path)?;
    drop_owned_overrides(&mut file)?;

    for dep in deps {
        let rel = fs::relative_path(file.dir(), &dep.origin);
        add_override(
            &mut file,
            OverrideEntry {
                old: ModuleRef::new(dep.module.clone()),
                new: ModuleRef::new(rel.to_string_lossy().into_owned()),
                ownership: Ownership::Direct,
            },
        )?;
        tracing::debug!(dst = pkg.name(), dep = %dep.module, "linked modules");
    }

    for dep in deps {
        for foreign in &dep.overrides {
            add_override(
                &mut file,
                OverrideEntry {
                    old: foreign.old.clone(),
                    new: foreign.new.clone(),
                    ownership: Ownership::Indirect {
                        source: dep.package.clone(),
                    },
                },
            )?;
        }
    }

    file.cleanup();
    file.write()
}

fn drop_owned_overrides(file: &mut ModuleFile) -> Result<(), LinkError> {
    for entry in file.overrides()? {
        match entry.ownership {
            Ownership::Foreign | Ownership::Ignore => continue,
            Ownership::Direct | Ownership::Indirect { .. } => {
                tracing::debug!(rep = %entry.old, "dropping override");
                file.drop_override(&entry.old);
            }
        }
    }
    Ok(())
}

/// Insert an entry unless its key is already taken.
///
/// A foreign or ignore-marked holder of the key is a hard conflict. An owned
/// holder was added earlier in this same run (stale owned entries are gone by
/// now): identical targets are deduplicated, first by sorted dependency order
/// wins; diverging targets are a conflict.
fn add_override(file: &mut ModuleFile, entry: OverrideEntry) -> Result<(), LinkError> {
    for existing in file.overrides()? {
        if existing.old != entry.old {
            continue;
        }

        match &existing.ownership {
            Ownership::Foreign | Ownership::Ignore => {
                return Err(LinkError::ForeignConflict {
                    path: file.path().to_path_buf(),
                    key: entry.old.as_key(),
                });
            }
            Ownership::Direct | Ownership::Indirect { .. } => {
                if existing.new == entry.new {
                    tracing::debug!(key = %entry.old, "skipping duplicate propagated override");
                    return Ok(());
                }
                return Err(LinkError::PropagationConflict {
                    key: entry.old.as_key(),
                    first: provenance(&existing.ownership),
                    second: provenance(&entry.ownership),
                });
            }
        }
    }

    file.add_override(&entry);
    Ok(())
}

fn provenance(ownership: &Ownership) -> String {
    match ownership {
        Ownership::Indirect { source } => format!("`{}`", source),
        _ => "the direct link set".to_string(),
    }
}
