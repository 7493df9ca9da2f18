//! Schema resolution over the Go syntax tree.
//!
//! Provider schemas are rarely a single literal. The resolver follows an
//! expression through a fixed set of shapes until it reaches a composite
//! literal:
//!
//! | shape                               | followed for             |
//! |-------------------------------------|--------------------------|
//! | `T{...}` / elided `{...}`           | everything               |
//! | `&expr`, `(expr)`                   | everything               |
//! | identifier (local, then package)    | provider and schema maps |
//! | `helper()` with no args or params   | provider and schema maps |
//!
//! Attribute and `Elem` values must be literals (optionally behind `&`).
//! Anything else is an error naming the attribute and source location.

use crate::syntax::{
    excerpt, expressions, field_key, is_type_named, keyed_parts, named, operator, statements,
    unwrap_element,
};
use crate::symbols::{Site, SymbolTable};
use crate::{ResolveError, literal};
use std::collections::HashSet;
use tfmigrate_schema::{AttrType, Attribute, Block, BlockKind, SchemaEntry, ValueKind};
use tree_sitter::Node;

/// Maximum number of indirections followed from one expression.
pub const MAX_DEPTH: usize = 32;

/// Resolver settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Reject schema fields the migrator does not model instead of ignoring them.
    pub strict_fields: bool,
}

/// Where local identifiers are looked up.
///
/// `body` is the enclosing function body, if any; only statements starting
/// before byte offset `before` are visible.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    body: Option<Node<'a>>,
    before: usize,
}

impl<'a> Scope<'a> {
    /// Package scope: no locals.
    pub fn package() -> Self {
        Self {
            body: None,
            before: 0,
        }
    }

    /// Inside `body`, seeing statements that start before `before`.
    pub fn function(body: Node<'a>, before: usize) -> Self {
        Self {
            body: Some(body),
            before,
        }
    }
}

/// What the caller is trying to resolve; controls which shapes are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expect {
    Provider,
    SchemaMap,
    Attribute,
    Elem,
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Self::Provider => "a schema.Provider literal",
            Self::SchemaMap => "a map[string]*schema.Schema literal",
            Self::Attribute => "a schema.Schema literal",
            Self::Elem => "a schema.Schema or schema.Resource literal",
        }
    }

    fn follows_symbols(self) -> bool {
        matches!(self, Self::Provider | Self::SchemaMap)
    }

    fn accepts_elided(self) -> bool {
        matches!(self, Self::Attribute | Self::Elem)
    }
}

enum Shape<'a> {
    Composite { ty: Node<'a>, body: Node<'a> },
    Elided(Node<'a>),
    AddressOf(Node<'a>),
    Paren(Node<'a>),
    Ident,
    Call {
        callee: Node<'a>,
        args: Option<Node<'a>>,
    },
    Other,
}

fn classify(node: Node) -> Shape {
    match node.kind() {
        "composite_literal" => match (
            node.child_by_field_name("type"),
            node.child_by_field_name("body"),
        ) {
            (Some(ty), Some(body)) => Shape::Composite { ty, body },
            _ => Shape::Other,
        },
        "literal_value" => Shape::Elided(node),
        "unary_expression" if operator(node) == Some("&") => node
            .child_by_field_name("operand")
            .map_or(Shape::Other, Shape::AddressOf),
        "parenthesized_expression" => named(node)
            .into_iter()
            .next()
            .map_or(Shape::Other, Shape::Paren),
        "identifier" => Shape::Ident,
        "call_expression" => match node.child_by_field_name("function") {
            Some(callee) => Shape::Call {
                callee,
                args: node.child_by_field_name("arguments"),
            },
            None => Shape::Other,
        },
        _ => Shape::Other,
    }
}

/// A composite literal reached by resolution.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Literal<'a> {
    /// The literal itself, for locations.
    pub site: Site<'a>,
    /// Declared type; `None` for elided literals inside a typed map.
    pub ty: Option<Node<'a>>,
    /// The `literal_value` node.
    pub body: Node<'a>,
    /// Scope the literal's sub-expressions resolve in.
    pub scope: Scope<'a>,
}

impl<'a> Literal<'a> {
    pub(crate) fn is_type(&self, name: &str) -> bool {
        self.ty
            .is_some_and(|ty| is_type_named(ty, self.site.file.source(), name))
    }

    /// `Field: value` pairs of a struct literal, in source order.
    fn fields(&self) -> Vec<(&'a str, Node<'a>)> {
        named(self.body)
            .into_iter()
            .filter(|el| el.kind() == "keyed_element")
            .filter_map(keyed_parts)
            .filter_map(|(key, value)| {
                field_key(key, self.site.file.source()).map(|name| (name, value))
            })
            .collect()
    }

    pub(crate) fn field(&self, name: &str) -> Option<Node<'a>> {
        self.fields()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// The `Elem` of a collection attribute.
enum Elem {
    Scalar(ValueKind),
    Resource(Vec<SchemaEntry>),
}

/// Resolves provider schema literals through the symbol table.
pub struct SchemaResolver<'a> {
    symbols: &'a SymbolTable<'a>,
    options: ResolveOptions,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(symbols: &'a SymbolTable<'a>, options: ResolveOptions) -> Self {
        Self { symbols, options }
    }

    /// Follow `site` to a composite literal acceptable for `expect`.
    pub(crate) fn resolve_literal(
        &self,
        site: Site<'a>,
        scope: Scope<'a>,
        expect: Expect,
        depth: usize,
    ) -> Result<Literal<'a>, ResolveError> {
        let site = site.with(unwrap_element(site.node));
        if depth > MAX_DEPTH {
            return Err(ResolveError::DepthExceeded {
                name: excerpt(site.node, site.file.source()),
                location: site.location(),
            });
        }

        match classify(site.node) {
            Shape::Composite { ty, body } => Ok(Literal {
                site,
                ty: Some(ty),
                body,
                scope,
            }),
            Shape::Elided(body) if expect.accepts_elided() => Ok(Literal {
                site,
                ty: None,
                body,
                scope,
            }),
            Shape::AddressOf(inner) | Shape::Paren(inner) => {
                self.resolve_literal(site.with(inner), scope, expect, depth + 1)
            }
            Shape::Ident if expect.follows_symbols() => {
                self.resolve_identifier(site, scope, expect, depth)
            }
            Shape::Call { callee, args } if expect.follows_symbols() => {
                self.resolve_call(site, callee, args, expect, depth)
            }
            _ => Err(ResolveError::UnrecognizedShape {
                expected: expect.describe(),
                found: excerpt(site.node, site.file.source()),
                location: site.location(),
            }),
        }
    }

    /// Local bindings shadow package-level variables.
    fn resolve_identifier(
        &self,
        site: Site<'a>,
        scope: Scope<'a>,
        expect: Expect,
        depth: usize,
    ) -> Result<Literal<'a>, ResolveError> {
        let name = site.text();
        if let Some((value, stmt)) = local_binding(site, name, scope) {
            if let Some(write) = scope
                .body
                .and_then(|body| later_write(site, body, name, stmt.end_byte()))
            {
                return Err(ResolveError::ModifiedLocal {
                    name: name.to_string(),
                    location: site.with(write).location(),
                });
            }
            tracing::trace!(name, at = %site.location(), "following local binding");
            let inner = Scope {
                body: scope.body,
                before: stmt.start_byte(),
            };
            return self.resolve_literal(site.with(value), inner, expect, depth + 1);
        }

        match self.symbols.variable(name, site.file)? {
            Some(var) => {
                tracing::trace!(name, at = %var.location(), "following package variable");
                self.resolve_literal(var, Scope::package(), expect, depth + 1)
            }
            None => Err(ResolveError::UnresolvedSymbol {
                name: name.to_string(),
                location: site.location(),
            }),
        }
    }

    /// Follow a call to a zero-argument package-level function through its
    /// first top-level `return`.
    fn resolve_call(
        &self,
        site: Site<'a>,
        callee: Node<'a>,
        args: Option<Node<'a>>,
        expect: Expect,
        depth: usize,
    ) -> Result<Literal<'a>, ResolveError> {
        let name = site.with(callee).text();
        let fail = |reason: &'static str| ResolveError::UnresolvedFunction {
            name: name.to_string(),
            reason,
            location: site.location(),
        };

        if callee.kind() != "identifier" {
            return Err(fail("only calls to package-level functions are followed"));
        }
        if args.is_some_and(|args| !named(args).is_empty()) {
            return Err(fail("call arguments are not evaluated"));
        }
        let func = self
            .symbols
            .function(name, site.file)?
            .ok_or_else(|| fail("no package-level function with that name"))?;
        let has_params = func
            .node
            .child_by_field_name("parameters")
            .is_some_and(|params| !named(params).is_empty());
        if has_params {
            return Err(fail("functions with parameters are not followed"));
        }
        let body = func
            .node
            .child_by_field_name("body")
            .ok_or_else(|| fail("function has no body"))?;
        let ret = statements(body)
            .into_iter()
            .find(|stmt| stmt.kind() == "return_statement")
            .ok_or_else(|| fail("function has no top-level return"))?;
        let value = named(ret)
            .into_iter()
            .next()
            .and_then(|list| expressions(list).into_iter().next())
            .ok_or_else(|| fail("return statement has no value"))?;

        tracing::trace!(name, at = %func.location(), "following helper function");
        self.resolve_literal(
            func.with(value),
            Scope::function(body, ret.start_byte()),
            expect,
            depth + 1,
        )
    }

    /// Resolve a `map[string]*schema.Schema` expression into entries, in
    /// source order.
    pub fn resolve_schema_map(
        &self,
        site: Site<'a>,
        scope: Scope<'a>,
    ) -> Result<Vec<SchemaEntry>, ResolveError> {
        self.schema_map_at(site, scope, 0)
    }

    /// `depth` carries across nested `Resource.Schema` maps so that a helper
    /// reaching itself through `Elem` still hits [`MAX_DEPTH`].
    fn schema_map_at(
        &self,
        site: Site<'a>,
        scope: Scope<'a>,
        depth: usize,
    ) -> Result<Vec<SchemaEntry>, ResolveError> {
        let lit = self.resolve_literal(site, scope, Expect::SchemaMap, depth)?;
        if !lit.ty.is_some_and(|ty| ty.kind() == "map_type") {
            return Err(ResolveError::UnrecognizedShape {
                expected: Expect::SchemaMap.describe(),
                found: excerpt(lit.site.node, lit.site.file.source()),
                location: lit.site.location(),
            });
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for element in named(lit.body) {
            let element_site = lit.site.with(element);
            let (key, value) = match element.kind() {
                "keyed_element" => keyed_parts(element),
                _ => None,
            }
            .ok_or_else(|| ResolveError::UnkeyedEntry {
                location: element_site.location(),
            })?;

            let key_site = lit.site.with(key);
            let name = match key.kind() {
                "interpreted_string_literal" | "raw_string_literal" => {
                    literal::unquote(key_site.text())
                }
                _ => None,
            }
            .ok_or_else(|| ResolveError::NonLiteralKey {
                found: excerpt(key, lit.site.file.source()),
                location: key_site.location(),
            })?;

            if !seen.insert(name.clone()) {
                return Err(ResolveError::DuplicateEntry {
                    name,
                    location: key_site.location(),
                });
            }
            let entry = self.resolve_entry(&name, lit.site.with(value), lit.scope, depth + 1)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Resolve one `*schema.Schema` value into an attribute or block.
    fn resolve_entry(
        &self,
        name: &str,
        site: Site<'a>,
        scope: Scope<'a>,
        depth: usize,
    ) -> Result<SchemaEntry, ResolveError> {
        let not_schema = |site: Site| ResolveError::NotSchemaLiteral {
            attribute: name.to_string(),
            found: excerpt(site.node, site.file.source()),
            location: site.location(),
        };
        let lit = match self.resolve_literal(site, scope, Expect::Attribute, depth) {
            Ok(lit) => lit,
            Err(ResolveError::UnrecognizedShape { .. }) => return Err(not_schema(site)),
            Err(err) => return Err(err),
        };
        if lit.ty.is_some() && !lit.is_type("Schema") {
            return Err(not_schema(lit.site));
        }

        let mut kind = None;
        let mut elem = None;
        let mut attr = Attribute::new(name, AttrType::String);
        for (field, value) in lit.fields() {
            let value_site = lit.site.with(value);
            match field {
                "Type" => kind = Some(parse_type(name, value_site)?),
                "Elem" => {
                    elem = Some(self.resolve_elem(name, value_site, lit.scope, depth + 1)?);
                }
                "Optional" => attr.optional = self.bool_field(name, field, value_site),
                "Required" => attr.required = self.bool_field(name, field, value_site),
                "Computed" => attr.computed = self.bool_field(name, field, value_site),
                "Sensitive" => attr.sensitive = self.bool_field(name, field, value_site),
                "Description" => match string_value(value_site) {
                    Some(text) => attr.description = text,
                    None => tracing::warn!(
                        attribute = name,
                        at = %value_site.location(),
                        "non-literal Description ignored"
                    ),
                },
                "MinItems" => attr.min_items = self.int_field(name, field, value_site),
                "MaxItems" => attr.max_items = self.int_field(name, field, value_site),
                other if self.options.strict_fields => {
                    return Err(ResolveError::UnsupportedField {
                        attribute: name.to_string(),
                        field: other.to_string(),
                    });
                }
                other => tracing::debug!(attribute = name, field = other, "field ignored"),
            }
        }

        let kind = kind.ok_or_else(|| ResolveError::MissingType {
            attribute: name.to_string(),
        })?;

        match elem {
            Some(Elem::Resource(entries)) => {
                let block_kind =
                    BlockKind::from_kind(kind).ok_or_else(|| ResolveError::ResourceElemKind {
                        attribute: name.to_string(),
                        kind,
                    })?;
                if let Some(nested) = entries.iter().find_map(|entry| match entry {
                    SchemaEntry::Block(block) => Some(block.name.clone()),
                    SchemaEntry::Attribute(_) => None,
                }) {
                    return Err(ResolveError::NestedBlock {
                        attribute: name.to_string(),
                        nested,
                    });
                }
                let mut block = Block::from_entries(name, block_kind, entries)?;
                block.description = attr.description;
                block.min_items = attr.min_items;
                block.max_items = attr.max_items;
                Ok(SchemaEntry::Block(block))
            }
            Some(Elem::Scalar(elem)) => {
                attr.ty = AttrType::from_parts(name, kind, Some(elem))?;
                Ok(SchemaEntry::Attribute(attr))
            }
            None => {
                attr.ty = AttrType::from_parts(name, kind, None)?;
                Ok(SchemaEntry::Attribute(attr))
            }
        }
    }

    fn resolve_elem(
        &self,
        attribute: &str,
        site: Site<'a>,
        scope: Scope<'a>,
        depth: usize,
    ) -> Result<Elem, ResolveError> {
        let invalid = |reason: String| ResolveError::InvalidElem {
            attribute: attribute.to_string(),
            reason,
        };
        let lit = match self.resolve_literal(site, scope, Expect::Elem, depth) {
            Ok(lit) => lit,
            Err(ResolveError::UnrecognizedShape {
                expected,
                found,
                location,
            }) => {
                return Err(invalid(format!(
                    "{location}: Elem must be {expected}, found `{found}`"
                )));
            }
            Err(err) => return Err(err),
        };

        if lit.ty.is_none() || lit.is_type("Schema") {
            let ty = lit
                .field("Type")
                .ok_or_else(|| invalid("Elem schema has no Type".to_string()))?;
            return Ok(Elem::Scalar(parse_type(attribute, lit.site.with(ty))?));
        }

        if lit.is_type("Resource") {
            let schema = lit
                .field("Schema")
                .ok_or_else(|| ResolveError::MissingResourceSchema {
                    attribute: attribute.to_string(),
                })?;
            let entries = self
                .schema_map_at(lit.site.with(schema), lit.scope, depth + 1)
                .map_err(|err| ResolveError::InResource {
                    attribute: attribute.to_string(),
                    source: Box::new(err),
                })?;
            return Ok(Elem::Resource(entries));
        }

        Err(invalid(format!(
            "{}: Elem must be {}, found `{}`",
            lit.site.location(),
            Expect::Elem.describe(),
            excerpt(lit.site.node, lit.site.file.source())
        )))
    }

    /// Literal `true`/`false`; anything else is left unset.
    fn bool_field(&self, attribute: &str, field: &str, site: Site) -> bool {
        match site.node.kind() {
            "true" => true,
            "false" => false,
            _ => {
                tracing::warn!(
                    attribute,
                    field,
                    at = %site.location(),
                    "non-literal boolean ignored"
                );
                false
            }
        }
    }

    fn int_field(&self, attribute: &str, field: &str, site: Site) -> Option<i64> {
        let value = int_value(site);
        if value.is_none() {
            tracing::warn!(
                attribute,
                field,
                at = %site.location(),
                "non-literal integer ignored"
            );
        }
        value
    }
}

/// The nearest binding of `name` in `scope` preceding the reference.
///
/// Returns the bound expression and its statement.
fn local_binding<'a>(
    site: Site<'a>,
    name: &str,
    scope: Scope<'a>,
) -> Option<(Node<'a>, Node<'a>)> {
    let body = scope.body?;
    let mut found = None;
    for stmt in statements(body) {
        if stmt.start_byte() >= scope.before {
            break;
        }
        if let Some(value) = binding_in(site, stmt, name) {
            found = Some((value, stmt));
        }
    }
    found
}

fn binding_in<'a>(site: Site<'a>, stmt: Node<'a>, name: &str) -> Option<Node<'a>> {
    let pair = |left: Node<'a>, right: Node<'a>| {
        expressions(left)
            .into_iter()
            .position(|target| site.with(target).text() == name)
            .and_then(|i| expressions(right).into_iter().nth(i))
    };
    match stmt.kind() {
        "short_var_declaration" => pair(
            stmt.child_by_field_name("left")?,
            stmt.child_by_field_name("right")?,
        ),
        "assignment_statement" if operator(stmt) == Some("=") => pair(
            stmt.child_by_field_name("left")?,
            stmt.child_by_field_name("right")?,
        ),
        "var_declaration" => crate::symbols::var_specs(stmt)
            .into_iter()
            .filter_map(|spec| {
                let mut cursor = spec.walk();
                let names: Vec<_> = spec.children_by_field_name("name", &mut cursor).collect();
                let values = expressions(spec.child_by_field_name("value")?);
                names
                    .iter()
                    .position(|n| site.with(*n).text() == name)
                    .and_then(|i| values.get(i).copied())
            })
            .last(),
        _ => None,
    }
}

/// The first statement or call in `body` after byte offset `after` that may
/// change what `name` holds: an assignment or `++`/`--` rooted at it
/// (`name = ...`, `name["k"] = ...`), or a call taking it (`delete(name, k)`).
///
/// Setting a struct field other than `Schema` directly on `name` (for
/// example `p.ConfigureContextFunc = ...`) does not count.
fn later_write<'a>(site: Site<'a>, body: Node<'a>, name: &str, after: usize) -> Option<Node<'a>> {
    let mut first: Option<Node<'a>> = None;
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        let past_first = first.is_some_and(|f| node.start_byte() >= f.start_byte());
        if node.end_byte() <= after || past_first {
            continue;
        }
        if node.start_byte() >= after && writes(site, node, name) {
            first = Some(node);
            continue;
        }
        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor));
    }
    first
}

fn writes<'a>(site: Site<'a>, node: Node<'a>, name: &str) -> bool {
    let is_name = |id: Option<Node<'a>>| id.is_some_and(|id| site.with(id).text() == name);
    let is_target = |target: Node<'a>| {
        target_root(target).is_some_and(|(id, field)| {
            is_name(Some(id)) && field.is_none_or(|f| site.with(f).text() == "Schema")
        })
    };
    match node.kind() {
        "assignment_statement" | "short_var_declaration" => node
            .child_by_field_name("left")
            .is_some_and(|left| expressions(left).into_iter().any(is_target)),
        "inc_statement" | "dec_statement" => named(node).into_iter().next().is_some_and(is_target),
        "call_expression" => node.child_by_field_name("arguments").is_some_and(|args| {
            named(args).into_iter().any(|arg| is_name(bare_identifier(arg)))
        }),
        _ => false,
    }
}

/// The identifier an assignment target is rooted at, plus the field selected
/// directly on it: `p.Schema["k"]` gives `p` and `Schema`, `m["k"].Type`
/// gives `m` alone.
fn target_root(mut node: Node) -> Option<(Node, Option<Node>)> {
    let mut field = None;
    loop {
        node = match node.kind() {
            "identifier" => return Some((node, field)),
            "selector_expression" => {
                field = node.child_by_field_name("field");
                node.child_by_field_name("operand")?
            }
            "index_expression" | "slice_expression" | "unary_expression" => {
                field = None;
                node.child_by_field_name("operand")?
            }
            "parenthesized_expression" => named(node).into_iter().next()?,
            _ => return None,
        };
    }
}

/// `m`, `&m` or `(m)`.
fn bare_identifier(mut node: Node) -> Option<Node> {
    loop {
        node = match node.kind() {
            "identifier" => return Some(node),
            "unary_expression" if operator(node) == Some("&") => {
                node.child_by_field_name("operand")?
            }
            "parenthesized_expression" => named(node).into_iter().next()?,
            _ => return None,
        };
    }
}

/// `schema.TypeX` (or a dot-imported `TypeX`) to a value kind.
fn parse_type(attribute: &str, site: Site) -> Result<ValueKind, ResolveError> {
    let node = unwrap_element(site.node);
    let token = match node.kind() {
        "selector_expression" => node.child_by_field_name("field").map(|f| site.with(f).text()),
        "identifier" => Some(site.with(node).text()),
        _ => None,
    }
    .ok_or_else(|| ResolveError::InvalidType {
        attribute: attribute.to_string(),
        found: excerpt(node, site.file.source()),
    })?;
    ValueKind::from_sdk_name(token).ok_or_else(|| ResolveError::UnknownType {
        attribute: attribute.to_string(),
        name: token.to_string(),
    })
}

/// String literals and `+` concatenations of them.
fn string_value(site: Site) -> Option<String> {
    let node = unwrap_element(site.node);
    match node.kind() {
        "interpreted_string_literal" | "raw_string_literal" => {
            literal::unquote(site.with(node).text())
        }
        "binary_expression" if operator(node) == Some("+") => {
            let left = string_value(site.with(node.child_by_field_name("left")?))?;
            let right = string_value(site.with(node.child_by_field_name("right")?))?;
            Some(left + &right)
        }
        "parenthesized_expression" => string_value(site.with(named(node).into_iter().next()?)),
        _ => None,
    }
}

fn int_value(site: Site) -> Option<i64> {
    let node = unwrap_element(site.node);
    match node.kind() {
        "int_literal" => literal::parse_int(site.with(node).text()),
        "unary_expression" if operator(node) == Some("-") => {
            int_value(site.with(node.child_by_field_name("operand")?)).map(|v| -v)
        }
        "parenthesized_expression" => int_value(site.with(named(node).into_iter().next()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceIndex;
    use tfmigrate_schema::ElemType;

    const HEADER: &str = r#"package p

import "github.com/hashicorp/terraform-plugin-sdk/v2/helper/schema"

"#;

    /// Resolve package variable `target` in a single-file package.
    fn resolve(body: &str, target: &str) -> Result<Vec<SchemaEntry>, ResolveError> {
        resolve_with(body, target, ResolveOptions::default())
    }

    fn resolve_with(
        body: &str,
        target: &str,
        options: ResolveOptions,
    ) -> Result<Vec<SchemaEntry>, ResolveError> {
        let index = SourceIndex::from_sources([("p/p.go", format!("{HEADER}{body}"))]).unwrap();
        let symbols = SymbolTable::build(&index);
        let resolver = SchemaResolver::new(&symbols, options);
        let site = symbols
            .variable(target, &index.files()[0])
            .unwrap()
            .expect("target variable");
        resolver.resolve_schema_map(site, Scope::package())
    }

    fn attr(entries: &[SchemaEntry], name: &str) -> Attribute {
        entries
            .iter()
            .find_map(|e| match e {
                SchemaEntry::Attribute(a) if a.name == name => Some(a.clone()),
                _ => None,
            })
            .unwrap_or_else(|| panic!("attribute {name} not found"))
    }

    #[test]
    fn test_inline_attributes() {
        let entries = resolve(
            r#"var s = map[string]*schema.Schema{
	"endpoint": {
		Type:        schema.TypeString,
		Required:    true,
		Description: "API " + "endpoint",
	},
	"retries": &schema.Schema{Type: schema.TypeInt, Optional: true, MaxItems: 0x10},
	"tags": {Type: schema.TypeMap, Optional: true, Elem: &schema.Schema{Type: schema.TypeString}},
}
"#,
            "s",
        )
        .unwrap();
        assert_eq!(entries.len(), 3);
        let endpoint = attr(&entries, "endpoint");
        assert_eq!(endpoint.ty, AttrType::String);
        assert!(endpoint.required && !endpoint.optional);
        assert_eq!(endpoint.description, "API endpoint");
        let retries = attr(&entries, "retries");
        assert_eq!(retries.ty, AttrType::Int);
        assert_eq!(retries.max_items, Some(16));
        assert_eq!(attr(&entries, "tags").ty, AttrType::Map(ElemType::String));
    }

    #[test]
    fn test_follows_variables_and_helpers() {
        let entries = resolve(
            r#"var s = schemaMap()

func schemaMap() map[string]*schema.Schema {
	base := map[string]*schema.Schema{
		"token": {Type: schema.TypeString, Sensitive: true},
	}
	return base
}
"#,
            "s",
        )
        .unwrap();
        assert!(attr(&entries, "token").sensitive);
    }

    #[test]
    fn test_nearest_preceding_local_wins() {
        let entries = resolve(
            r#"var s = build()

func build() map[string]*schema.Schema {
	m := map[string]*schema.Schema{"first": {Type: schema.TypeString}}
	m = map[string]*schema.Schema{"second": {Type: schema.TypeBool}}
	return m
}
"#,
            "s",
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "second");
    }

    #[test]
    fn test_index_write_after_binding_rejected() {
        let err = resolve(
            r#"var s = build()

func build() map[string]*schema.Schema {
	m := map[string]*schema.Schema{"first": {Type: schema.TypeString}}
	m["second"] = &schema.Schema{Type: schema.TypeBool, Required: true}
	return m
}
"#,
            "s",
        )
        .unwrap_err();
        let ResolveError::ModifiedLocal { name, location } = &err else {
            panic!("expected modified local, got {err}");
        };
        assert_eq!(name, "m");
        assert_eq!(location, "p/p.go:9");
    }

    #[test]
    fn test_delete_and_conditional_reassignment_rejected() {
        let err = resolve(
            r#"var s = build()

func build() map[string]*schema.Schema {
	m := map[string]*schema.Schema{"first": {Type: schema.TypeString}}
	delete(m, "first")
	return m
}
"#,
            "s",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::ModifiedLocal { .. }), "{err}");

        let err = resolve(
            r#"var s = build()

var legacy = false

func build() map[string]*schema.Schema {
	m := map[string]*schema.Schema{"first": {Type: schema.TypeString}}
	if legacy {
		m = map[string]*schema.Schema{}
	}
	return m
}
"#,
            "s",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::ModifiedLocal { .. }), "{err}");
    }

    #[test]
    fn test_writes_to_other_locals_allowed() {
        let entries = resolve(
            r#"var s = build()

func build() map[string]*schema.Schema {
	m := map[string]*schema.Schema{"first": {Type: schema.TypeString}}
	other := map[string]*schema.Schema{}
	other["x"] = &schema.Schema{Type: schema.TypeBool}
	return m
}
"#,
            "s",
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_resource_elem_becomes_block() {
        let entries = resolve(
            r#"var s = map[string]*schema.Schema{
	"auth": {
		Type:     schema.TypeList,
		Optional: true,
		MaxItems: 1,
		Elem: &schema.Resource{
			Schema: map[string]*schema.Schema{
				"user":   {Type: schema.TypeString, Required: true},
				"scopes": {Type: schema.TypeSet, Elem: &schema.Schema{Type: schema.TypeString}},
			},
		},
	},
}
"#,
            "s",
        )
        .unwrap();
        let SchemaEntry::Block(block) = &entries[0] else {
            panic!("expected block, got {:?}", entries[0]);
        };
        assert_eq!(block.kind, BlockKind::List);
        assert_eq!(block.max_items, Some(1));
        assert!(block.attribute("user").unwrap().required);
        assert_eq!(
            block.attribute("scopes").unwrap().ty,
            AttrType::Set(ElemType::String)
        );
    }

    #[test]
    fn test_nested_block_rejected() {
        let err = resolve(
            r#"var s = map[string]*schema.Schema{
	"outer": {
		Type: schema.TypeList,
		Elem: &schema.Resource{Schema: map[string]*schema.Schema{
			"inner": {Type: schema.TypeList, Elem: &schema.Resource{Schema: map[string]*schema.Schema{}}},
		}},
	},
}
"#,
            "s",
        )
        .unwrap_err();
        let ResolveError::NestedBlock { attribute, nested } = &err else {
            panic!("expected nested block, got {err}");
        };
        assert_eq!((attribute.as_str(), nested.as_str()), ("outer", "inner"));
    }

    #[test]
    fn test_resource_elem_on_map_rejected() {
        let err = resolve(
            r#"var s = map[string]*schema.Schema{
	"m": {Type: schema.TypeMap, Elem: &schema.Resource{Schema: map[string]*schema.Schema{}}},
}
"#,
            "s",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "schema attribute \"m\" has resource Elem but type is map"
        );
    }

    #[test]
    fn test_non_literal_key_rejected() {
        let err = resolve(
            r#"const key = "name"

var s = map[string]*schema.Schema{
	key: {Type: schema.TypeString},
}
"#,
            "s",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("attribute name must be a literal"), "{msg}");
        assert!(msg.contains("p/p.go:8"), "{msg}");
    }

    #[test]
    fn test_attribute_must_be_literal() {
        let err = resolve(
            r#"var shared = &schema.Schema{Type: schema.TypeString}

var s = map[string]*schema.Schema{"name": shared}
"#,
            "s",
        )
        .unwrap_err();
        let ResolveError::NotSchemaLiteral { attribute, .. } = &err else {
            panic!("expected non-literal attribute, got {err}");
        };
        assert_eq!(attribute, "name");
    }

    #[test]
    fn test_collection_without_elem() {
        let err = resolve(
            "var s = map[string]*schema.Schema{\"ids\": {Type: schema.TypeList}}\n",
            "s",
        )
        .unwrap_err();
        assert!(err.to_string().contains("\"ids\""));
    }

    #[test]
    fn test_missing_type_and_unknown_type() {
        let err = resolve(
            "var s = map[string]*schema.Schema{\"a\": {Optional: true}}\n",
            "s",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "schema attribute \"a\": missing Type");

        let err = resolve(
            "var s = map[string]*schema.Schema{\"a\": {Type: schema.TypeInvalid}}\n",
            "s",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownType { ref name, .. } if name == "TypeInvalid"));
    }

    #[test]
    fn test_non_literal_bool_left_unset() {
        let entries = resolve(
            r#"var optional = true

var s = map[string]*schema.Schema{"a": {Type: schema.TypeString, Optional: optional}}
"#,
            "s",
        )
        .unwrap();
        assert!(!attr(&entries, "a").optional);
    }

    #[test]
    fn test_unknown_fields_ignored_unless_strict() {
        let body = r#"var s = map[string]*schema.Schema{
	"a": {Type: schema.TypeString, Optional: true, Default: "x", ForceNew: true},
}
"#;
        assert!(resolve(body, "s").is_ok());
        let err = resolve_with(
            body,
            "s",
            ResolveOptions {
                strict_fields: true,
            },
        )
        .unwrap_err();
        assert!(
            matches!(err, ResolveError::UnsupportedField { ref field, .. } if field == "Default")
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = resolve(
            r#"var s = map[string]*schema.Schema{
	"a": {Type: schema.TypeString},
	"a": {Type: schema.TypeBool},
}
"#,
            "s",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateEntry { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_call_with_arguments_rejected() {
        let err = resolve(
            r#"var s = build(1)

func build(n int) map[string]*schema.Schema { return nil }
"#,
            "s",
        )
        .unwrap_err();
        assert!(err.to_string().contains("call arguments are not evaluated"));
    }

    #[test]
    fn test_unresolved_symbol() {
        let err = resolve("var s = missing\n", "s").unwrap_err();
        assert!(
            matches!(err, ResolveError::UnresolvedSymbol { ref name, .. } if name == "missing")
        );
    }

    #[test]
    fn test_cycle_hits_depth_limit() {
        let err = resolve("var s = t\n\nvar t = s\n", "s").unwrap_err();
        assert!(matches!(err, ResolveError::DepthExceeded { .. }));
    }

    #[test]
    fn test_self_referencing_resource_hits_depth_limit() {
        let err = resolve(
            r#"var s = inner()

func inner() map[string]*schema.Schema {
	return map[string]*schema.Schema{
		"x": {Type: schema.TypeList, Elem: &schema.Resource{Schema: inner()}},
	}
}
"#,
            "s",
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InResource { .. }), "{err}");
        assert!(err.to_string().contains("resolution depth exceeded"), "{err}");
    }
}
