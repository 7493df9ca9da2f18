//! Go front end for provider migration.
//!
//! Reads a Go module with tree-sitter and extracts the provider's
//! configuration schema into a [`SchemaModel`](tfmigrate_schema::SchemaModel).
//!
//! # Architecture
//!
//! ```text
//! module tree ──> SourceIndex ──> SymbolTable ──> SchemaResolver ──> SchemaModel
//!                 (index.rs)      (symbols.rs)    (resolve.rs,
//!                      │                           provider.rs)
//!                      └──────> entry point ─────────────────────> EntrypointInfo
//!                               (entrypoint.rs)
//! ```
//!
//! The symbol table is built once per run and only read afterwards. The
//! resolver follows schema-bearing expressions through `&`, package-level
//! variables, local variables and zero-argument helper functions, and fails
//! with a localized [`ResolveError`] on any shape it does not recognise.
//!
//! # Example
//!
//! ```ignore
//! use tfmigrate_go::{ResolveOptions, SchemaResolver, SourceIndex, SymbolTable};
//!
//! let index = SourceIndex::scan(root, &Default::default())?;
//! let symbols = SymbolTable::build(&index);
//! let resolver = SchemaResolver::new(&symbols, ResolveOptions::default());
//! let provider = resolver.resolve_provider(&index)?;
//! println!("{} attributes", provider.model.attributes().len());
//! ```

pub mod entrypoint;
pub mod error;
pub mod index;
pub mod literal;
pub mod parse;
pub mod provider;
pub mod resolve;
pub mod symbols;
mod syntax;

pub use entrypoint::find_entrypoint;
pub use error::{GoError, ResolveError};
pub use index::{IndexOptions, SourceFile, SourceIndex};
pub use parse::{SyntaxError, first_syntax_error, parse_go};
pub use provider::ProviderSchema;
pub use resolve::{ResolveOptions, SchemaResolver, Scope};
pub use symbols::{Site, SymbolTable};
