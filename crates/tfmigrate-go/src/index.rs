//! Parsed Go sources of one module.

use crate::parse::{first_syntax_error, parse_go};
use crate::syntax::{named, text};
use crate::GoError;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};
use walkdir::WalkDir;

/// Directory names never descended into.
const SKIP_DIRS: &[&str] = &["vendor", "testdata"];

/// Options controlling which files are indexed.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    /// Extra directory names to skip, in addition to `vendor`, `testdata`
    /// and names starting with `.` or `_`.
    pub exclude: Vec<String>,
}

/// One parsed `.go` file.
pub struct SourceFile {
    path: PathBuf,
    package: String,
    source: String,
    tree: Tree,
}

impl SourceFile {
    /// Parse `source`. Files with syntax errors are kept; tree-sitter
    /// recovers and the intact parts stay usable.
    pub fn parse(path: impl Into<PathBuf>, source: String) -> Result<Self, GoError> {
        let path = path.into();
        let tree = parse_go(&source)?;
        if let Some(err) = first_syntax_error(&tree) {
            tracing::warn!(path = %path.display(), at = %err, "syntax error in Go source");
        }
        let package = named(tree.root_node())
            .into_iter()
            .find(|n| n.kind() == "package_clause")
            .and_then(|clause| named(clause).into_iter().next())
            .map(|ident| text(ident, &source).to_string())
            .unwrap_or_default();
        Ok(Self {
            path,
            package,
            source,
            tree,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory of the file; files in one directory form one package.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node) -> &str {
        text(node, &self.source)
    }

    /// `path:line` of a node.
    pub fn location(&self, node: Node) -> String {
        format!("{}:{}", self.path.display(), node.start_position().row + 1)
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("package", &self.package)
            .finish_non_exhaustive()
    }
}

/// All non-test Go files under a module root.
#[derive(Debug, Default)]
pub struct SourceIndex {
    root: PathBuf,
    files: Vec<SourceFile>,
}

impl SourceIndex {
    /// Walk `root` and parse every `.go` file except `_test.go` files.
    ///
    /// Files are visited in sorted path order, so "first match" lookups
    /// are deterministic.
    pub fn scan(root: &Path, options: &IndexOptions) -> Result<Self, GoError> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !skip_dir(&entry.file_name().to_string_lossy(), &options.exclude)
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_go_source(entry.path()) {
                continue;
            }
            let path = entry.path().to_path_buf();
            let source = std::fs::read_to_string(&path).map_err(|source| GoError::Io {
                path: path.clone(),
                source,
            })?;
            files.push(SourceFile::parse(path, source)?);
        }

        tracing::debug!(root = %root.display(), files = files.len(), "indexed Go sources");
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    /// Build an index from in-memory sources. Paths are kept as given.
    pub fn from_sources<I, P, S>(sources: I) -> Result<Self, GoError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let files = sources
            .into_iter()
            .map(|(path, source)| SourceFile::parse(path, source.into()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            root: PathBuf::new(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn skip_dir(name: &str, exclude: &[String]) -> bool {
    name.starts_with('.')
        || name.starts_with('_')
        || SKIP_DIRS.contains(&name)
        || exclude.iter().any(|e| e == name)
}

fn is_go_source(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".go") && !n.ends_with("_test.go"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_skips_tests_vendor_and_hidden() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "main.go", "package main\n");
        write(root, "provider/provider.go", "package provider\n");
        write(root, "provider/provider_test.go", "package provider\n");
        write(root, "vendor/x/x.go", "package x\n");
        write(root, "testdata/fixture.go", "package fixture\n");
        write(root, ".git/hooks.go", "package hooks\n");
        write(root, "_scratch/s.go", "package s\n");
        write(root, "gen/gen.go", "package gen\n");
        write(root, "README.md", "# readme\n");

        let options = IndexOptions {
            exclude: vec!["gen".to_string()],
        };
        let index = SourceIndex::scan(root, &options).unwrap();
        let rels: Vec<_> = index
            .files()
            .iter()
            .map(|f| f.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rels,
            vec![PathBuf::from("main.go"), PathBuf::from("provider/provider.go")]
        );
        assert_eq!(index.files()[1].package(), "provider");
    }

    #[test]
    fn test_keeps_files_with_syntax_errors() {
        let index = SourceIndex::from_sources([
            ("a/a.go", "package a\n\nfunc broken( {\n"),
            ("a/b.go", "package a\n\nvar X = 1\n"),
        ])
        .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.files()[0].package(), "a");
        assert_eq!(index.files()[1].dir(), Path::new("a"));
    }
}
