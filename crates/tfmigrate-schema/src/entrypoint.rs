//! Metadata about the program entry point.

use serde::Serialize;
use std::path::PathBuf;

/// Everything the regenerated `main.go` needs to know about the original one.
///
/// Directives are kept verbatim, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntrypointInfo {
    /// File the entry point was read from.
    pub path: PathBuf,
    /// Import path of the package providing `Provider()`.
    pub provider_import: String,
    /// Local name the provider package is referenced by in `main`.
    pub provider_alias: String,
    /// Whether the import spec named the package explicitly.
    pub explicit_alias: bool,
    /// `//go:build` and `// +build` lines preceding the package clause.
    pub build_directives: Vec<String>,
    /// `//go:generate` lines.
    pub generate_directives: Vec<String>,
}

impl EntrypointInfo {
    /// Whether `main` was found to reference the provider package at all.
    pub fn references_provider(&self) -> bool {
        !self.provider_import.is_empty() && !self.provider_alias.is_empty()
    }
}
