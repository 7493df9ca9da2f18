//! Dialect-neutral model of a provider configuration schema.
//!
//! `tfmigrate-schema` sits between the Go front end and the code generator:
//!
//! ```text
//! Source dialect             Model                Target dialect
//! ───────────────       ───────────────       ──────────────────────
//! schema.Provider{  ─┐                     ┌─> schema.Schema{
//!   Schema: ...      ├─> SchemaModel ──────┤     Attributes: ...,
//! }                 ─┘   EntrypointInfo    └─>   Blocks: ...}
//!                                              main.go (mux server)
//! ```
//!
//! The model is built fresh for every migration run and never persisted.
//!
//! # Example
//!
//! ```
//! use tfmigrate_schema::{Attribute, AttrType, SchemaModel};
//!
//! let mut model = SchemaModel::new();
//! let mut token = Attribute::new("token", AttrType::String);
//! token.required = true;
//! token.sensitive = true;
//! model.insert_attribute(token).unwrap();
//!
//! assert_eq!(model.attributes().count(), 1);
//! assert!(!model.uses_collections());
//! ```

pub mod entrypoint;
pub mod model;

pub use entrypoint::EntrypointInfo;
pub use model::{
    AttrType, Attribute, Block, BlockKind, ElemType, ModelError, SchemaEntry, SchemaModel,
    ValueKind,
};
