//! Module-level plumbing around a migration.
//!
//! - [`gomod`]: reading `go.mod`, locating the module root, editing requirements
//! - [`version`]: semantic-version precedence for module versions
//! - [`deps`]: the two dependency bundles and the baseline that selects one
//! - [`names`]: provider name and registry address derived from the module path
//! - [`tool`]: `go mod download` / `go mod vendor`

pub mod deps;
pub mod error;
pub mod gomod;
pub mod names;
pub mod tool;
pub mod version;

pub use deps::{Bundle, LEGACY_BUNDLE, MODERN_BUNDLE, select_bundle};
pub use error::{ModuleError, ToolError};
pub use gomod::{GoMod, Require, RequireChange, find_module_root};
pub use names::{derive_provider_name, derive_registry_address, module_base};
pub use tool::GoTool;
pub use version::GoVersion;
