//! The regenerated `main.go` serving both providers through one mux server.

use crate::SynthesisError;
use crate::quote::go_quote;
use crate::writer::GoWriter;
use tfmigrate_go::entrypoint::default_package_name;
use tfmigrate_schema::EntrypointInfo;

/// Imports every generated `main.go` uses, by package name.
const FIXED_IMPORTS: &[(&str, &str)] = &[
    (
        "providerserver",
        "github.com/hashicorp/terraform-plugin-framework/providerserver",
    ),
    ("tfprotov5", "github.com/hashicorp/terraform-plugin-go/tfprotov5"),
    (
        "tf5server",
        "github.com/hashicorp/terraform-plugin-go/tfprotov5/tf5server",
    ),
    (
        "tf5muxserver",
        "github.com/hashicorp/terraform-plugin-mux/tf5muxserver",
    ),
    (
        "schema",
        "github.com/hashicorp/terraform-plugin-sdk/v2/helper/schema",
    ),
];

/// Identifiers declared by the generated code itself.
const RESERVED: &[&str] = &[
    "context",
    "log",
    "main",
    "primary",
    "ctx",
    "muxServer",
    "err",
    "goServeOpts",
];

const FRAMEWORK_FALLBACK_ALIAS: &str = "fwprovider";

/// Inputs of the muxed entry point.
#[derive(Debug, Clone, Copy)]
pub struct MuxMain<'a> {
    pub entry: &'a EntrypointInfo,
    /// Import path of the generated framework package.
    pub framework_import: &'a str,
    /// Address the provider is served under, e.g. `registry.terraform.io/acme/acme`.
    pub registry_address: &'a str,
}

/// Render `main.go`.
///
/// Build and generate directives are carried over verbatim. The provider
/// import keeps its explicit alias if it had one; the framework package is
/// imported as `framework` unless that name is already taken.
pub fn render_mux_main(main: &MuxMain) -> Result<String, SynthesisError> {
    let entry = main.entry;
    if !entry.references_provider() {
        return Err(SynthesisError::MissingProviderImport);
    }
    let provider_alias = entry.provider_alias.as_str();
    let collides = RESERVED.contains(&provider_alias)
        || FIXED_IMPORTS.iter().any(|(name, _)| *name == provider_alias);
    if collides {
        return Err(SynthesisError::AliasCollision {
            alias: provider_alias.to_string(),
        });
    }

    let framework_name = default_package_name(main.framework_import);
    let framework_alias = if framework_name == provider_alias {
        FRAMEWORK_FALLBACK_ALIAS
    } else {
        framework_name
    };

    let mut module_imports: Vec<(&str, String)> = FIXED_IMPORTS
        .iter()
        .map(|(_, path)| (*path, go_quote(path)))
        .collect();
    module_imports.push((
        main.framework_import,
        import_line(framework_alias, framework_name, main.framework_import),
    ));
    module_imports.push((
        entry.provider_import.as_str(),
        if entry.explicit_alias {
            format!("{provider_alias} {}", go_quote(&entry.provider_import))
        } else {
            go_quote(&entry.provider_import)
        },
    ));
    module_imports.sort_by(|a, b| a.0.cmp(b.0));
    module_imports.dedup_by(|a, b| a.0 == b.0);

    let mut w = GoWriter::new();
    if !entry.build_directives.is_empty() {
        for directive in &entry.build_directives {
            w.line(directive);
        }
        w.line("");
    }
    w.line("package main");
    w.line("");
    w.open("import (");
    w.line("\"context\"");
    w.line("\"log\"");
    w.line("");
    for (_, line) in &module_imports {
        w.line(line);
    }
    w.close(")");
    w.line("");
    if !entry.generate_directives.is_empty() {
        for directive in &entry.generate_directives {
            w.line(directive);
        }
        w.line("");
    }

    w.open("func main() {");
    w.line(&format!("primary := {provider_alias}.Provider()"));
    w.line("");
    w.line("ctx := context.Background()");
    w.open("muxServer, err := tf5muxserver.NewMuxServer(ctx,");
    w.open("func() tfprotov5.ProviderServer {");
    w.line("return schema.NewGRPCProviderServer(primary)");
    w.close("},");
    w.line(&format!(
        "providerserver.NewProtocol5({framework_alias}.New(primary)),"
    ));
    w.close(")");
    w.open("if err != nil {");
    w.line("log.Fatal(err)");
    w.close("}");
    w.line("");
    w.line("goServeOpts := []tf5server.ServeOpt{}");
    w.open("err = tf5server.Serve(");
    w.line(&format!("{},", go_quote(main.registry_address)));
    w.line("muxServer.ProviderServer,");
    w.line("goServeOpts...,");
    w.close(")");
    w.open("if err != nil {");
    w.line("log.Fatal(err)");
    w.close("}");
    w.close("}");
    Ok(w.finish())
}

fn import_line(alias: &str, package: &str, path: &str) -> String {
    if alias == package {
        go_quote(path)
    } else {
        format!("{alias} {}", go_quote(path))
    }
}
