//! Package-level declarations across the module.

use crate::syntax::{expressions, named, text};
use crate::{ResolveError, SourceFile, SourceIndex};
use std::collections::HashMap;
use tree_sitter::Node;

/// A node together with the file it belongs to.
#[derive(Clone, Copy)]
pub struct Site<'a> {
    pub file: &'a SourceFile,
    pub node: Node<'a>,
}

impl<'a> Site<'a> {
    pub fn new(file: &'a SourceFile, node: Node<'a>) -> Self {
        Self { file, node }
    }

    /// Same file, another node.
    pub fn with(&self, node: Node<'a>) -> Self {
        Self {
            file: self.file,
            node,
        }
    }

    pub fn text(&self) -> &'a str {
        text(self.node, self.file.source())
    }

    pub fn location(&self) -> String {
        self.file.location(self.node)
    }
}

impl std::fmt::Debug for Site<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Site({} {})", self.location(), self.node.kind())
    }
}

/// Top-level function declarations and variable initializers, by name.
///
/// Duplicate names across packages are all kept; [`SymbolTable::function`]
/// and [`SymbolTable::variable`] disambiguate by package directory.
#[derive(Debug, Default)]
pub struct SymbolTable<'a> {
    functions: HashMap<&'a str, Vec<Site<'a>>>,
    variables: HashMap<&'a str, Vec<Site<'a>>>,
}

impl<'a> SymbolTable<'a> {
    /// Collect declarations from every file in the index.
    pub fn build(index: &'a SourceIndex) -> Self {
        let mut table = Self::default();
        for file in index.files() {
            for decl in named(file.root()) {
                match decl.kind() {
                    "function_declaration" => {
                        if let Some(name) = decl.child_by_field_name("name") {
                            table
                                .functions
                                .entry(text(name, file.source()))
                                .or_default()
                                .push(Site::new(file, decl));
                        }
                    }
                    "var_declaration" => table.collect_vars(file, decl),
                    _ => {}
                }
            }
        }
        tracing::debug!(
            functions = table.functions.len(),
            variables = table.variables.len(),
            "built symbol table"
        );
        table
    }

    fn collect_vars(&mut self, file: &'a SourceFile, decl: Node<'a>) {
        for spec in var_specs(decl) {
            let mut cursor = spec.walk();
            let names: Vec<_> = spec.children_by_field_name("name", &mut cursor).collect();
            let Some(values) = spec.child_by_field_name("value") else {
                continue;
            };
            for (name, value) in names.into_iter().zip(expressions(values)) {
                self.variables
                    .entry(text(name, file.source()))
                    .or_default()
                    .push(Site::new(file, value));
            }
        }
    }

    /// The `function_declaration` named `name`, as seen from `from`.
    pub fn function(
        &self,
        name: &str,
        from: &SourceFile,
    ) -> Result<Option<Site<'a>>, ResolveError> {
        pick(name, self.functions.get(name), from)
    }

    /// The initializer expression of the package-level variable `name`.
    pub fn variable(
        &self,
        name: &str,
        from: &SourceFile,
    ) -> Result<Option<Site<'a>>, ResolveError> {
        pick(name, self.variables.get(name), from)
    }

    pub fn function_count(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.values().map(Vec::len).sum()
    }
}

/// `var_spec` nodes of a `var_declaration`, flattening `var_spec_list`.
pub(crate) fn var_specs(decl: Node) -> Vec<Node> {
    let mut specs = Vec::new();
    for child in named(decl) {
        match child.kind() {
            "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(
                named(child)
                    .into_iter()
                    .filter(|spec| spec.kind() == "var_spec"),
            ),
            _ => {}
        }
    }
    specs
}

/// Prefer the declaration in the referencing file's package, then a unique
/// declaration anywhere. Anything else is ambiguous.
fn pick<'a>(
    name: &str,
    candidates: Option<&Vec<Site<'a>>>,
    from: &SourceFile,
) -> Result<Option<Site<'a>>, ResolveError> {
    let Some(candidates) = candidates else {
        return Ok(None);
    };
    if let [only] = candidates.as_slice() {
        return Ok(Some(*only));
    }

    let local: Vec<_> = candidates
        .iter()
        .filter(|site| site.file.dir() == from.dir())
        .collect();
    if let [only] = local.as_slice() {
        return Ok(Some(**only));
    }

    let ambiguous = if local.is_empty() {
        candidates.iter().collect()
    } else {
        local
    };
    Err(ResolveError::AmbiguousSymbol {
        name: name.to_string(),
        candidates: ambiguous.iter().map(|site| site.location()).collect(),
    })
}
