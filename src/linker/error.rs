//! Linker error types.

use std::path::PathBuf;

use thiserror::Error;

/// Error during manifest reconciliation.
///
/// A missing registry entry for a resolved dependency is deliberately not
/// represented here: it degrades the link (logged warning) without making
/// the written manifest unusable.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("not a module workspace: {} does not exist", .path.display())]
    NotAWorkspace { path: PathBuf },

    #[error("package `{package}` has no Module.toml in its declared sources")]
    ManifestNotFound { package: String },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("invalid manifest {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("override for `{key}` already exists in {}, but is not managed by moorage", .path.display())]
    ForeignConflict { path: PathBuf, key: String },

    #[error("conflicting overrides for `{key}`: {first} and {second} disagree on the target")]
    PropagationConflict {
        key: String,
        first: String,
        second: String,
    },

    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
