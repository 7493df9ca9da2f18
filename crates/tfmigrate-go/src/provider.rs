//! Locating the provider constructor and its configuration schema.

use crate::resolve::{Expect, SchemaResolver, Scope};
use crate::symbols::Site;
use crate::syntax::{excerpt, expressions, find_first, is_type_named, named, statements};
use crate::{ResolveError, SourceFile, SourceIndex};
use std::path::{Path, PathBuf};
use tfmigrate_schema::SchemaModel;
use tree_sitter::Node;

/// The resolved provider schema and where it was declared.
#[derive(Debug, Clone)]
pub struct ProviderSchema {
    /// File declaring `func Provider()`.
    pub path: PathBuf,
    /// Go package name of that file.
    pub package: String,
    pub model: SchemaModel,
}

impl ProviderSchema {
    /// Directory of the provider package.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

impl<'a> SchemaResolver<'a> {
    /// Find `func Provider() *schema.Provider` and resolve its `Schema` field.
    ///
    /// The first matching function in sorted file order wins. Inside it, the
    /// first `schema.Provider` literal in pre-order is used; if there is
    /// none, the first top-level `return` value is resolved instead. A
    /// provider without a `Schema` field yields an empty model.
    pub fn resolve_provider(&self, index: &'a SourceIndex) -> Result<ProviderSchema, ResolveError> {
        for file in index.files() {
            for decl in named(file.root()) {
                if decl.kind() != "function_declaration" || !is_provider_func(file, decl) {
                    continue;
                }
                let Some(body) = decl.child_by_field_name("body") else {
                    continue;
                };
                tracing::debug!(at = %file.location(decl), "found provider function");

                let site = Site::new(file, decl);
                let lit = match provider_literal(file, body) {
                    Some(node) => self.resolve_literal(
                        site.with(node),
                        Scope::function(body, node.start_byte()),
                        Expect::Provider,
                        0,
                    )?,
                    None => {
                        let ret = statements(body)
                            .into_iter()
                            .find(|stmt| stmt.kind() == "return_statement")
                            .and_then(|ret| named(ret).into_iter().next().map(|v| (ret, v)))
                            .ok_or(ResolveError::ProviderNotFound)?;
                        let value = expressions(ret.1)
                            .into_iter()
                            .next()
                            .ok_or(ResolveError::ProviderNotFound)?;
                        self.resolve_literal(
                            site.with(value),
                            Scope::function(body, ret.0.start_byte()),
                            Expect::Provider,
                            0,
                        )?
                    }
                };

                if !lit.is_type("Provider") {
                    return Err(ResolveError::UnrecognizedShape {
                        expected: "a schema.Provider literal",
                        found: excerpt(lit.site.node, lit.site.file.source()),
                        location: lit.site.location(),
                    });
                }

                let model = match lit.field("Schema") {
                    Some(schema) => {
                        let entries = self.resolve_schema_map(lit.site.with(schema), lit.scope)?;
                        SchemaModel::from_entries(entries)?
                    }
                    None => {
                        tracing::warn!(at = %lit.site.location(), "provider has no Schema field");
                        SchemaModel::new()
                    }
                };

                return Ok(ProviderSchema {
                    path: file.path().to_path_buf(),
                    package: file.package().to_string(),
                    model,
                });
            }
        }
        Err(ResolveError::ProviderNotFound)
    }
}

/// `func Provider() *schema.Provider` (any qualifier, pointer or not).
fn is_provider_func(file: &SourceFile, decl: Node) -> bool {
    let named_provider = decl
        .child_by_field_name("name")
        .is_some_and(|name| file.text(name) == "Provider");
    if !named_provider {
        return false;
    }
    let Some(result) = decl.child_by_field_name("result") else {
        return false;
    };
    if result.kind() == "parameter_list" {
        return named(result).into_iter().any(|param| {
            param
                .child_by_field_name("type")
                .is_some_and(|ty| is_type_named(ty, file.source(), "Provider"))
        });
    }
    is_type_named(result, file.source(), "Provider")
}

/// First `schema.Provider{...}` composite literal in the body, pre-order.
fn provider_literal<'t>(file: &SourceFile, body: Node<'t>) -> Option<Node<'t>> {
    find_first(body, &|node| {
        node.kind() == "composite_literal"
            && node
                .child_by_field_name("type")
                .is_some_and(|ty| is_type_named(ty, file.source(), "Provider"))
    })
}
