//! Code synthesis for provider migration.
//!
//! Two artifacts are produced from a resolved
//! [`SchemaModel`](tfmigrate_schema::SchemaModel) and
//! [`EntrypointInfo`](tfmigrate_schema::EntrypointInfo):
//!
//! - a `framework` package implementing `provider.Provider` with the same
//!   configuration schema ([`render_framework_provider`]);
//! - a `main.go` serving the SDK provider and the framework provider through
//!   one `tf5muxserver` ([`render_mux_main`]).
//!
//! Rendering is deterministic: entries are emitted sorted by name and the
//! output depends only on the model. Every artifact is validated by parsing
//! it back before it is handed to the caller ([`Formatter::finish`]).

pub mod error;
pub mod features;
pub mod format;
pub mod framework;
pub mod mapping;
pub mod mux;
pub mod quote;
mod writer;

pub use error::SynthesisError;
pub use features::Features;
pub use format::{Formatter, GofmtMode, validate};
pub use framework::render_framework_provider;
pub use mux::{MuxMain, render_mux_main};
pub use quote::go_quote;
