//! Moorage - a workspace linker for monorepos
//!
//! This crate provides the core library functionality for Moorage:
//! workspace discovery and the manifest reconciliation engine that keeps
//! per-package `Module.toml` files and the shared `Workspace.toml` in sync
//! with computed local-path overrides.

pub mod core;
pub mod linker;
pub mod util;

pub use crate::core::{Manifest, Package, PackageKind, Workspace};
pub use crate::linker::{LinkError, Ownership};
pub use crate::util::GlobalContext;
