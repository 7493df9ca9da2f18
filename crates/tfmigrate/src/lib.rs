//! Migrate a Terraform SDKv2 provider to a muxed plugin-framework provider.
//!
//! [`check`] validates that a provider module can be migrated; [`migrate`]
//! additionally:
//!
//! - generates a `framework` package serving the same provider schema,
//! - rewrites `main.go` to serve both providers through `tf5muxserver`,
//! - adds the framework, mux and plugin-go modules to `go.mod`.
//!
//! Nothing is written unless every artifact rendered and validated.
//!
//! # Example
//!
//! ```no_run
//! let mut options = tfmigrate::Options::new("path/to/terraform-provider-acme");
//! options.dry_run = true;
//! let report = tfmigrate::migrate(&options)?;
//! println!("{}", report.summary());
//! # Ok::<(), tfmigrate::MigrateError>(())
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod report;

pub use config::{MigrateConfig, VendorMode};
pub use error::MigrateError;
pub use options::Options;
pub use pipeline::{check, migrate};
pub use report::Report;
