//! Locating the program entry point (`main.go` in package `main`).

use crate::syntax::{find_first, named, text};
use crate::{SourceFile, SourceIndex, literal};
use tfmigrate_schema::EntrypointInfo;
use tree_sitter::Node;

/// Find the provider's `main.go`.
///
/// Candidates are files named `main.go` declaring `package main`, in sorted
/// path order. The first one whose `main` references `<pkg>.Provider` wins;
/// otherwise the first candidate is returned as is.
pub fn find_entrypoint(index: &SourceIndex) -> Option<EntrypointInfo> {
    let mut fallback = None;
    for file in index.files() {
        if file.file_name() != Some("main.go") || file.package() != "main" {
            continue;
        }
        let info = read_entrypoint(file);
        if info.references_provider() {
            tracing::debug!(
                path = %file.path().display(),
                alias = %info.provider_alias,
                "found entry point"
            );
            return Some(info);
        }
        fallback.get_or_insert(info);
    }
    if fallback.is_some() {
        tracing::warn!("main.go does not reference a Provider function");
    }
    fallback
}

struct ImportSpec {
    name: String,
    path: String,
    explicit: bool,
}

fn read_entrypoint(file: &SourceFile) -> EntrypointInfo {
    let root = file.root();
    let source = file.source();
    let package_start = named(root)
        .into_iter()
        .find(|n| n.kind() == "package_clause")
        .map_or(usize::MAX, |n| n.start_byte());

    let mut info = EntrypointInfo {
        path: file.path().to_path_buf(),
        ..Default::default()
    };

    // comments are direct children of source_file when at top level
    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        if node.kind() != "comment" {
            continue;
        }
        let line = text(node, source).trim_end();
        if line.starts_with("//go:generate") {
            info.generate_directives.push(line.to_string());
        } else if node.start_byte() < package_start
            && (line.starts_with("//go:build") || line.starts_with("// +build"))
        {
            info.build_directives.push(line.to_string());
        }
    }

    let imports = import_specs(root, source);
    let main_body = named(root)
        .into_iter()
        .filter(|n| n.kind() == "function_declaration")
        .find(|n| {
            n.child_by_field_name("name")
                .is_some_and(|name| text(name, source) == "main")
        })
        .and_then(|n| n.child_by_field_name("body"));

    let alias = main_body
        .and_then(|body| provider_selector(body, source))
        .or_else(|| provider_selector(root, source));

    if let Some(alias) = alias
        && let Some(spec) = imports.iter().find(|spec| spec.name == alias)
    {
        info.provider_alias = spec.name.clone();
        info.provider_import = spec.path.clone();
        info.explicit_alias = spec.explicit;
    }
    info
}

/// Package name of the first `pkg.Provider` selector under `node`.
fn provider_selector<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let found = find_first(node, &|n| {
        n.kind() == "selector_expression"
            && n.child_by_field_name("field")
                .is_some_and(|f| text(f, source) == "Provider")
            && n.child_by_field_name("operand")
                .is_some_and(|o| o.kind() == "identifier")
    })?;
    found
        .child_by_field_name("operand")
        .map(|operand| text(operand, source))
}

fn import_specs(root: Node, source: &str) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    for decl in named(root)
        .into_iter()
        .filter(|n| n.kind() == "import_declaration")
    {
        let mut nodes = Vec::new();
        for child in named(decl) {
            match child.kind() {
                "import_spec" => nodes.push(child),
                "import_spec_list" => nodes.extend(
                    named(child)
                        .into_iter()
                        .filter(|n| n.kind() == "import_spec"),
                ),
                _ => {}
            }
        }
        for spec in nodes {
            let Some(path) = spec
                .child_by_field_name("path")
                .and_then(|p| literal::unquote(text(p, source)))
            else {
                continue;
            };
            match spec.child_by_field_name("name") {
                Some(name) if name.kind() == "package_identifier" => specs.push(ImportSpec {
                    name: text(name, source).to_string(),
                    path,
                    explicit: true,
                }),
                // blank and dot imports cannot be referenced by selector
                Some(_) => {}
                None => specs.push(ImportSpec {
                    name: default_package_name(&path).to_string(),
                    path,
                    explicit: false,
                }),
            }
        }
    }
    specs
}

/// Conventional package name for an import path: the last element, skipping
/// a major-version suffix such as `/v2`.
pub fn default_package_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    let is_major = last.len() > 1
        && last.starts_with('v')
        && last[1..].chars().all(|c| c.is_ascii_digit());
    if is_major {
        segments.next().unwrap_or(last)
    } else {
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &str = r#"//go:build !windows
// +build !windows

// Command main serves the provider.
package main

import (
	"flag"

	p "example.com/acme/terraform-provider-acme/internal/provider"
	"github.com/hashicorp/terraform-plugin-sdk/v2/plugin"
)

//go:generate terraform fmt -recursive ./examples/
//go:generate go run github.com/hashicorp/terraform-plugin-docs/cmd/tfplugindocs

func main() {
	flag.Parse()
	plugin.Serve(&plugin.ServeOpts{ProviderFunc: p.Provider})
}
"#;

    #[test]
    fn test_reads_alias_and_directives() {
        let index = SourceIndex::from_sources([("main.go", MAIN)]).unwrap();
        let info = find_entrypoint(&index).unwrap();
        assert_eq!(info.provider_alias, "p");
        assert!(info.explicit_alias);
        assert_eq!(
            info.provider_import,
            "example.com/acme/terraform-provider-acme/internal/provider"
        );
        assert_eq!(
            info.build_directives,
            vec!["//go:build !windows", "// +build !windows"]
        );
        assert_eq!(info.generate_directives.len(), 2);
        assert!(info.generate_directives[0].starts_with("//go:generate terraform fmt"));
    }

    #[test]
    fn test_implicit_alias_and_preference() {
        let index = SourceIndex::from_sources([
            ("cmd/tool/main.go", "package main\n\nfunc main() {}\n"),
            (
                "main.go",
                "package main\n\nimport \"example.com/x/provider/v3\"\n\nfunc main() { _ = provider.Provider }\n",
            ),
        ])
        .unwrap();
        let info = find_entrypoint(&index).unwrap();
        assert_eq!(info.path, std::path::PathBuf::from("main.go"));
        assert_eq!(info.provider_alias, "provider");
        assert!(!info.explicit_alias);
        assert_eq!(info.provider_import, "example.com/x/provider/v3");
    }

    #[test]
    fn test_no_main_package() {
        let index =
            SourceIndex::from_sources([("main.go", "package provider\n\nfunc main() {}\n")])
                .unwrap();
        assert!(find_entrypoint(&index).is_none());
    }

    #[test]
    fn test_default_package_name() {
        assert_eq!(default_package_name("example.com/a/provider"), "provider");
        assert_eq!(default_package_name("example.com/a/sdk/v2"), "sdk");
        assert_eq!(default_package_name("fmt"), "fmt");
        assert_eq!(default_package_name("example.com/v"), "v");
    }
}
