use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

/// Outcome of a check or migration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub module_root: PathBuf,
    pub main_file: Option<PathBuf>,
    pub framework_file: Option<PathBuf>,
    /// Empty when it could not be derived (check only).
    pub provider_name: String,
    /// Empty when it could not be derived (check only).
    pub registry_address: String,
    pub attributes: usize,
    pub blocks: usize,
    /// `go.mod` requirement changes, e.g. `github.com/x v1.0.0 -> v1.2.0`.
    pub requires: Vec<String>,
    pub notes: Vec<String>,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    pub dry_run: bool,
}

impl Report {
    /// One-line summary for the terminal.
    pub fn summary(&self) -> String {
        let mut msg = format!(
            "module={} provider={} registry={} attrs={}",
            self.module_root.display(),
            self.provider_name,
            self.registry_address,
            self.attributes
        );
        if self.blocks > 0 {
            let _ = write!(msg, " blocks={}", self.blocks);
        }
        if let Some(main) = &self.main_file {
            let _ = write!(msg, " main={}", main.display());
        }
        if let Some(framework) = &self.framework_file {
            let _ = write!(msg, " framework={}", framework.display());
        }
        if !self.notes.is_empty() {
            let _ = write!(msg, " notes={}", self.notes.len());
        }
        msg
    }
}
