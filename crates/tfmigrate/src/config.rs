//! Configuration for tfmigrate.
//!
//! Loads config from:
//! 1. Global: ~/.config/tfmigrate/config.toml (or `$XDG_CONFIG_HOME/tfmigrate/config.toml`)
//! 2. Per-project: `<module root>/.tfmigrate/config.toml` (overrides global)
//!
//! Every field is optional so that a layer only overrides what it sets.
//! Command-line flags override both layers.
//!
//! Example config.toml:
//! ```toml
//! [naming]
//! registry_address = "registry.terraform.io/acme/acme"
//!
//! [index]
//! exclude = ["acctest"]
//!
//! [output]
//! gofmt = "never"
//!
//! [toolchain]
//! download = false
//! vendor = "off"
//! ```

use crate::MigrateError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tfmigrate_codegen::GofmtMode;

/// Whether `go mod vendor` runs after migrating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VendorMode {
    On,
    Off,
    /// Only if the module already has a `vendor/` directory.
    #[default]
    Auto,
}

/// Overrides for the derived provider name and registry address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub provider_name: Option<String>,
    pub registry_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    /// Reject schema fields the framework provider cannot carry over.
    pub strict_fields: Option<bool>,
}

/// Source index configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Directory names to skip, in addition to `vendor` and `testdata`.
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub gofmt: Option<GofmtMode>,
}

/// External programs and what to run them for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// `go` binary (default: looked up on PATH).
    pub go: Option<PathBuf>,
    /// `gofmt` binary (default: looked up on PATH).
    pub gofmt: Option<PathBuf>,
    /// Run `go mod download` for the added modules.
    pub download: Option<bool>,
    pub vendor: Option<VendorMode>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    pub naming: NamingConfig,
    pub resolve: ResolveConfig,
    pub index: IndexConfig,
    pub output: OutputConfig,
    pub toolchain: ToolchainConfig,
}

impl MigrateConfig {
    /// Load configuration for a module.
    ///
    /// Loads global config from ~/.config/tfmigrate/config.toml,
    /// then merges with per-project config from .tfmigrate/config.toml.
    pub fn load(root: &Path) -> Result<Self, MigrateError> {
        Self::load_layers(Self::global_config_path().as_deref(), root)
    }

    /// [`load`](Self::load) with an explicit global config path.
    pub fn load_layers(global: Option<&Path>, root: &Path) -> Result<Self, MigrateError> {
        let mut config = Self::default();

        if let Some(global_path) = global
            && let Some(global) = Self::load_file(global_path)?
        {
            config = config.merge(global);
        }

        let project_path = Self::project_config_path(root);
        if let Some(project) = Self::load_file(&project_path)? {
            config = config.merge(project);
        }

        Ok(config)
    }

    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".tfmigrate").join("config.toml")
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("tfmigrate").join("config.toml"))
    }

    /// A missing file is no config; an unreadable or malformed one is an error.
    fn load_file(path: &Path) -> Result<Option<Self>, MigrateError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(MigrateError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = toml::from_str(&content).map_err(|e| MigrateError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Field-by-field merge: a value set in `other` replaces the one in `self`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            naming: NamingConfig {
                provider_name: other.naming.provider_name.or(self.naming.provider_name),
                registry_address: other
                    .naming
                    .registry_address
                    .or(self.naming.registry_address),
            },
            resolve: ResolveConfig {
                strict_fields: other.resolve.strict_fields.or(self.resolve.strict_fields),
            },
            index: IndexConfig {
                exclude: other.index.exclude.or(self.index.exclude),
            },
            output: OutputConfig {
                gofmt: other.output.gofmt.or(self.output.gofmt),
            },
            toolchain: ToolchainConfig {
                go: other.toolchain.go.or(self.toolchain.go),
                gofmt: other.toolchain.gofmt.or(self.toolchain.gofmt),
                download: other.toolchain.download.or(self.toolchain.download),
                vendor: other.toolchain.vendor.or(self.toolchain.vendor),
            },
        }
    }

    pub fn strict_fields(&self) -> bool {
        self.resolve.strict_fields.unwrap_or(false)
    }

    pub fn exclude(&self) -> &[String] {
        self.index.exclude.as_deref().unwrap_or(&[])
    }

    pub fn gofmt(&self) -> GofmtMode {
        self.output.gofmt.unwrap_or_default()
    }

    pub fn download(&self) -> bool {
        self.toolchain.download.unwrap_or(true)
    }

    pub fn vendor(&self) -> VendorMode {
        self.toolchain.vendor.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{content}").unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = MigrateConfig::default();
        assert!(!config.strict_fields());
        assert!(config.exclude().is_empty());
        assert_eq!(config.gofmt(), GofmtMode::Auto);
        assert!(config.download());
        assert_eq!(config.vendor(), VendorMode::Auto);
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &MigrateConfig::project_config_path(dir.path()),
            r#"
[output]
gofmt = "never"

[toolchain]
download = false
vendor = "off"
"#,
        );

        let config = MigrateConfig::load_layers(None, dir.path()).unwrap();
        assert_eq!(config.gofmt(), GofmtMode::Never);
        assert!(!config.download());
        assert_eq!(config.vendor(), VendorMode::Off);
        assert!(!config.strict_fields()); // default
    }

    #[test]
    fn test_project_overrides_only_what_it_sets() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global").join("config.toml");
        write_config(
            &global,
            r#"
[naming]
registry_address = "registry.terraform.io/acme/acme"

[resolve]
strict_fields = true

[toolchain]
vendor = "on"
"#,
        );
        let root = dir.path().join("module");
        write_config(
            &MigrateConfig::project_config_path(&root),
            r#"
[toolchain]
vendor = "off"
"#,
        );

        let config = MigrateConfig::load_layers(Some(&global), &root).unwrap();
        assert_eq!(
            config.naming.registry_address.as_deref(),
            Some("registry.terraform.io/acme/acme")
        );
        assert!(config.strict_fields());
        assert_eq!(config.vendor(), VendorMode::Off);
    }

    #[test]
    fn test_missing_files_are_defaults() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("nope.toml");
        let config = MigrateConfig::load_layers(Some(&global), dir.path()).unwrap();
        assert_eq!(config, MigrateConfig::default());
    }

    #[test]
    fn test_malformed_config_names_file() {
        let dir = TempDir::new().unwrap();
        let path = MigrateConfig::project_config_path(dir.path());
        write_config(&path, "[output]\ngofmt = \"sometimes\"\n");

        let err = MigrateConfig::load_layers(None, dir.path()).unwrap_err();
        assert!(matches!(err, MigrateError::Config { .. }));
        assert!(err.to_string().contains(".tfmigrate"), "{err}");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(
            &MigrateConfig::project_config_path(dir.path()),
            "[naming]\nprovider = \"acme\"\n",
        );
        assert!(MigrateConfig::load_layers(None, dir.path()).is_err());
    }
}
