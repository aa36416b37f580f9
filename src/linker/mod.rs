//! The manifest reconciliation engine.
//!
//! Keeps per-package `Module.toml` files and the shared `Workspace.toml` in
//! sync with computed local-path overrides, so sibling packages resolve
//! against each other's working-tree sources instead of published versions.
//!
//! Entries written by the engine carry a trailing `# moorage` annotation;
//! everything else in the manifests is foreign and never mutated. All
//! operations are full read → in-memory mutate → full write passes over the
//! files, which are the sole source of truth between invocations.

pub mod collect;
pub mod error;
pub mod link;
pub mod modfile;
pub mod ownership;
pub mod sync;

pub use collect::{collect_overrides, find_module_manifest, LinkRegistry, RegistryEntry};
pub use error::LinkError;
pub use link::{link_modules, remove_owned_overrides};
pub use modfile::{
    ModuleFile, ModuleRef, OverrideEntry, UseEntry, WorkFile, MODULE_MANIFEST, WORKSPACE_MANIFEST,
};
pub use ownership::{Ownership, MARKER};
pub use sync::sync_workspace;
