//! Global context for Moorage operations.
//!
//! There is no global mutable state in this crate; the context is an
//! explicit value constructed once in the binary and passed into operations.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::manifest::{Manifest, MANIFEST_NAME};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext { cwd })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        Ok(GlobalContext { cwd })
    }

    /// Find the workspace root by searching upward from cwd for a
    /// `Moorage.toml` with a `[workspace]` section.
    pub fn find_workspace_root(&self) -> Result<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                let manifest = Manifest::load(&candidate)?;
                if manifest.is_workspace() {
                    return Ok(current);
                }
            }
            if !current.pop() {
                anyhow::bail!(
                    "could not find a workspace {} in {} or any parent directory",
                    MANIFEST_NAME,
                    self.cwd.display()
                );
            }
        }
    }
}
