//! `moorage workspace` command

use anyhow::{Context, Result};

use crate::cli::WorkspaceArgs;
use moorage::core::Workspace;
use moorage::linker;
use moorage::util::GlobalContext;

pub fn execute(_args: WorkspaceArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let root = ctx.find_workspace_root()?;
    let workspace = Workspace::discover(&root)
        .with_context(|| format!("failed to load workspace at {}", root.display()))?;

    linker::sync_workspace(&workspace)?;

    tracing::info!("synchronized workspace manifest");

    Ok(())
}
