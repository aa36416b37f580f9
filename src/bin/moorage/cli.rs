//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Moorage - a workspace linker for monorepos
#[derive(Parser)]
#[command(name = "moorage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link module packages against their workspace dependencies
    Link(LinkArgs),

    /// Synchronize the workspace manifest and strip per-package overrides
    Workspace(WorkspaceArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct LinkArgs {
    /// Package to link (defaults to every module package)
    pub package: Option<String>,
}

#[derive(Args)]
pub struct WorkspaceArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
