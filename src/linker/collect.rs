//! Override collection.
//!
//! Scans every module package in a workspace and builds the registry the
//! linker resolves dependencies against. Collection is all-or-nothing: a
//! single unreadable or malformed manifest fails the whole pass, so a
//! partial registry is never handed downstream.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::{Package, Workspace};
use crate::linker::error::LinkError;
use crate::linker::modfile::{ModuleFile, OverrideEntry, MODULE_MANIFEST};

/// Link information for one module package.
#[derive(Debug)]
pub struct RegistryEntry {
    /// Resolved module identity
    pub module: String,

    /// Absolute path of the directory containing the module manifest
    pub origin: PathBuf,

    /// Originating package name
    pub package: String,

    /// The package's foreign overrides - candidates for propagation into
    /// dependents
    pub overrides: Vec<OverrideEntry>,
}

/// Registry of link information, keyed by package name.
pub type LinkRegistry = HashMap<String, RegistryEntry>;

/// Locate a package's module manifest among its declared sources.
pub fn find_module_manifest(pkg: &Package) -> Option<&Path> {
    pkg.sources()
        .iter()
        .map(PathBuf::as_path)
        .find(|src| src.file_name().is_some_and(|name| name == MODULE_MANIFEST))
}

/// Build the link registry for a workspace.
///
/// Packages without a module manifest are skipped. Owned overrides are
/// discarded here: they are never propagated, each dependent re-derives its
/// own set.
pub fn collect_overrides(workspace: &Workspace) -> Result<LinkRegistry, LinkError> {
    let mut registry = LinkRegistry::new();

    for pkg in workspace.module_packages() {
        let Some(manifest_path) = find_module_manifest(pkg) else {
            continue;
        };

        let file = ModuleFile::read(manifest_path)?;
        let module = file.module_name()?.to_string();

        let mut foreign = Vec::new();
        for entry in file.overrides()? {
            if entry.ownership.is_owned() {
                tracing::debug!(rep = %entry.old, pkg = pkg.name(), "ignoring owned override");
            } else {
                tracing::debug!(rep = %entry.old, pkg = pkg.name(), "collecting override");
                foreign.push(entry);
            }
        }

        registry.insert(
            pkg.name().to_string(),
            RegistryEntry {
                module,
                origin: file.dir().to_path_buf(),
                package: pkg.name().to_string(),
                overrides: foreign,
            },
        );
    }

    Ok(registry)
}
