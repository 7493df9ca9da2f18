use std::path::PathBuf;
use tfmigrate_codegen::SynthesisError;
use tfmigrate_go::{GoError, ResolveError};
use tfmigrate_gomod::{ModuleError, ToolError};

/// Anything that aborts a check or migration.
///
/// Every variant is raised before a file is written, except `Io` and `Tool`
/// coming from the write and toolchain steps themselves.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The provider schema does not have a recognised shape.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("{what} cannot be derived from module path {module:?}; pass {flag}")]
    Derivation {
        what: &'static str,
        module: String,
        flag: &'static str,
    },

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("go.mod not found from {}", .0.display())]
    ModuleRootNotFound(PathBuf),

    #[error(transparent)]
    Module(ModuleError),

    #[error("no main.go in package main found under {}", .0.display())]
    EntrypointNotFound(PathBuf),

    #[error("{} does not reference a Provider() function", .0.display())]
    ProviderNotReferenced(PathBuf),

    #[error("provider package {import:?} is outside module {module:?}")]
    ProviderOutsideModule { import: String, module: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Go(#[from] GoError),
}

impl From<ModuleError> for MigrateError {
    fn from(err: ModuleError) -> Self {
        match err {
            ModuleError::NotFound(path) => MigrateError::ModuleRootNotFound(path),
            other => MigrateError::Module(other),
        }
    }
}
