//! Package - a workspace member with its declared sources and dependencies.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::core::manifest::PackageConfig;
use crate::util::fs;

/// Package kind discriminator.
///
/// Only module packages carry a module manifest and participate in linking;
/// generic packages are inert as far as the linker is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// A package backed by a `Module.toml`
    #[default]
    Module,
    /// Anything else (scripts, assets, ...)
    Generic,
}

/// A workspace member package.
#[derive(Debug, Clone)]
pub struct Package {
    /// Workspace-unique name
    name: String,

    /// Package kind
    kind: PackageKind,

    /// Root directory of the package
    origin: PathBuf,

    /// Declared source files (absolute paths, expanded from globs)
    sources: Vec<PathBuf>,

    /// Direct dependencies, by package name
    deps: Vec<String>,
}

impl Package {
    /// Create a package from its configuration, expanding source globs
    /// relative to the package directory.
    pub fn from_config(config: PackageConfig, origin: PathBuf) -> Result<Self> {
        let sources = fs::glob_files(&origin, &config.sources)?;

        Ok(Package {
            name: config.name,
            kind: config.kind,
            origin,
            sources,
            deps: config.deps,
        })
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the package kind.
    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    /// Check if this is a module package.
    pub fn is_module(&self) -> bool {
        self.kind == PackageKind::Module
    }

    /// Get the package root directory.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Get the declared source files.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Get the direct dependency names.
    pub fn deps(&self) -> &[String] {
        &self.deps
    }
}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Package {}
