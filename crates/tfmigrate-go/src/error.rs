//! Errors raised while reading Go sources and resolving schemas.

use std::path::PathBuf;
use tfmigrate_schema::{ModelError, ValueKind};

/// Failure to read or parse Go sources.
#[derive(Debug, thiserror::Error)]
pub enum GoError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("tree-sitter init: {0}")]
    Grammar(String),

    #[error("failed to parse {0}")]
    Parse(PathBuf),
}

/// A schema-bearing expression did not match any recognized shape.
///
/// Every variant names the attribute, field or source location involved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("provider function not found (expected `func Provider() *schema.Provider`)")]
    ProviderNotFound,

    #[error("{location}: unresolved symbol {name:?}")]
    UnresolvedSymbol { name: String, location: String },

    #[error("ambiguous symbol {name:?}: declared in {}", candidates.join(", "))]
    AmbiguousSymbol {
        name: String,
        candidates: Vec<String>,
    },

    #[error("{location}: function {name:?} not resolved: {reason}")]
    UnresolvedFunction {
        name: String,
        reason: &'static str,
        location: String,
    },

    #[error("{location}: local {name:?} is modified after it is bound")]
    ModifiedLocal { name: String, location: String },

    #[error("{location}: resolution depth exceeded while following {name:?}")]
    DepthExceeded { name: String, location: String },

    #[error("{location}: expected {expected}, found `{found}`")]
    UnrecognizedShape {
        expected: &'static str,
        found: String,
        location: String,
    },

    #[error("{location}: schema attribute name must be a literal string, found `{found}`")]
    NonLiteralKey { found: String, location: String },

    #[error("{location}: schema map entries must be keyed by attribute name")]
    UnkeyedEntry { location: String },

    #[error("{location}: duplicate schema entry {name:?}")]
    DuplicateEntry { name: String, location: String },

    #[error(
        "{location}: schema attribute {attribute:?} is not a schema.Schema literal (found `{found}`)"
    )]
    NotSchemaLiteral {
        attribute: String,
        found: String,
        location: String,
    },

    #[error("schema attribute {attribute:?}: missing Type")]
    MissingType { attribute: String },

    #[error("schema attribute {attribute:?}: unsupported schema type {name}")]
    UnknownType { attribute: String, name: String },

    #[error("schema attribute {attribute:?}: Type must be a schema type constant, found `{found}`")]
    InvalidType { attribute: String, found: String },

    #[error("schema attribute {attribute:?}: unsupported field {field}")]
    UnsupportedField { attribute: String, field: String },

    #[error("schema attribute {attribute:?}: {reason}")]
    InvalidElem { attribute: String, reason: String },

    #[error("schema attribute {attribute:?}: Elem resource has no Schema field")]
    MissingResourceSchema { attribute: String },

    #[error("schema attribute {attribute:?} has resource Elem but type is {kind}")]
    ResourceElemKind { attribute: String, kind: ValueKind },

    #[error(
        "schema attribute {attribute:?}: nested block {nested:?} inside Elem resource is unsupported (one level of nesting only)"
    )]
    NestedBlock { attribute: String, nested: String },

    #[error("schema attribute {attribute:?}: {source}")]
    InResource {
        attribute: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}
