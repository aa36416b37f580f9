//! `moorage link` command

use anyhow::{Context, Result};

use crate::cli::LinkArgs;
use moorage::core::Workspace;
use moorage::linker;
use moorage::util::GlobalContext;

pub fn execute(args: LinkArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let root = ctx.find_workspace_root()?;
    let workspace = Workspace::discover(&root)
        .with_context(|| format!("failed to load workspace at {}", root.display()))?;

    let target = match &args.package {
        Some(name) => {
            let pkg = workspace.package(name).ok_or_else(|| {
                anyhow::anyhow!("package `{}` is not a workspace member", name)
            })?;
            if !pkg.is_module() {
                anyhow::bail!("package `{}` is not a module package", name);
            }
            Some(pkg)
        }
        None => None,
    };

    linker::link_modules(&workspace, target)?;

    match target {
        Some(pkg) => tracing::info!("linked `{}`", pkg.name()),
        None => tracing::info!("linked {} module package(s)", workspace.module_packages().count()),
    }

    Ok(())
}
