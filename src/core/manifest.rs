//! Moorage.toml parsing and schema.
//!
//! A `Moorage.toml` either declares the workspace (at the root, with a
//! `[workspace]` section) or a single package (with a `[package]` section).
//! This file is configuration input only; the linker never rewrites it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::package::PackageKind;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Moorage.toml";

/// Package declaration from the `[package]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    /// Workspace-unique package name
    pub name: String,

    /// Package kind; only module packages participate in linking
    #[serde(default)]
    pub kind: PackageKind,

    /// Direct dependencies, by package name
    #[serde(default)]
    pub deps: Vec<String>,

    /// Glob patterns for the package's source files
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

fn default_sources() -> Vec<String> {
    vec!["**/*".to_string()]
}

/// Workspace configuration from the `[workspace]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceConfig {
    /// Glob patterns for workspace member directories.
    #[serde(default)]
    pub members: Vec<String>,

    /// Glob patterns for directories to exclude from the workspace.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// The parsed Moorage.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Package declaration (None for the workspace root manifest)
    pub package: Option<PackageConfig>,

    /// Workspace configuration (None for package manifests)
    pub workspace: Option<WorkspaceConfig>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

/// Raw manifest as deserialized from TOML.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    package: Option<PackageConfig>,

    #[serde(default)]
    workspace: Option<WorkspaceConfig>,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let manifest_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        // Validate: must have either [package] or [workspace] (or both)
        if raw.package.is_none() && raw.workspace.is_none() {
            anyhow::bail!(
                "manifest at {} must have either [package] or [workspace] section",
                path.display()
            );
        }

        Ok(Manifest {
            package: raw.package,
            workspace: raw.workspace,
            manifest_dir,
        })
    }

    /// Check if this manifest has a workspace section.
    pub fn is_workspace(&self) -> bool {
        self.workspace.is_some()
    }

    /// Get the package name if this manifest has a package section.
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }
}
