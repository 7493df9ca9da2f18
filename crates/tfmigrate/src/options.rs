use crate::config::{MigrateConfig, VendorMode};
use std::path::PathBuf;

/// Inputs of [`check`](crate::check) and [`migrate`](crate::migrate).
///
/// Values set here take precedence over the configuration files.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Any path inside the provider module.
    pub path: PathBuf,
    pub registry_address: Option<String>,
    pub provider_name: Option<String>,
    /// Plan everything, write nothing.
    pub dry_run: bool,
    pub vendor: Option<VendorMode>,
    pub skip_download: bool,
    /// Use this instead of loading config files from the module root.
    pub config: Option<MigrateConfig>,
}

impl Options {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}
