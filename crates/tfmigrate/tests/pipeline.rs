//! End-to-end check/migrate runs against the provider fixtures.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tfmigrate::{MigrateConfig, MigrateError, Options, VendorMode};
use tfmigrate_codegen::{GofmtMode, validate};
use tfmigrate_go::ResolveError;

/// Copy `tests/fixtures/<name>` into a fresh temporary directory.
fn fixture(name: &str) -> TempDir {
    let src = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let dir = TempDir::new().unwrap();
    for entry in walkdir::WalkDir::new(&src) {
        let entry = entry.unwrap();
        let dest = dir.path().join(entry.path().strip_prefix(&src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).unwrap();
        } else {
            fs::copy(entry.path(), &dest).unwrap();
        }
    }
    dir
}

/// No gofmt, no downloads, no vendoring.
fn offline() -> MigrateConfig {
    let mut config = MigrateConfig::default();
    config.output.gofmt = Some(GofmtMode::Never);
    config.toolchain.download = Some(false);
    config.toolchain.vendor = Some(VendorMode::Off);
    config
}

fn options(dir: &Path) -> Options {
    Options {
        config: Some(offline()),
        ..Options::new(dir)
    }
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn check_reports_without_writing() {
    let dir = fixture("basic");
    let report = tfmigrate::check(&options(dir.path())).unwrap();

    assert_eq!(report.module_root, dir.path());
    assert_eq!(report.provider_name, "acme");
    assert_eq!(report.registry_address, "registry.terraform.io/acme/acme");
    assert_eq!(report.attributes, 3);
    assert_eq!(report.blocks, 1);
    assert_eq!(report.main_file.as_deref(), Some(dir.path().join("main.go").as_path()));
    let framework = dir.path().join("internal/framework/provider.go");
    assert_eq!(report.framework_file.as_deref(), Some(framework.as_path()));
    assert_eq!(
        report.notes,
        [
            "provider name derived from module path",
            "registry address derived from module path"
        ]
    );
    assert!(!framework.exists());
    assert!(report.written.is_empty());
}

#[test]
fn check_from_subdirectory_finds_module_root() {
    let dir = fixture("basic");
    let report = tfmigrate::check(&options(&dir.path().join("internal/provider"))).unwrap();
    assert_eq!(report.module_root, dir.path());
}

#[test]
fn migrate_writes_all_artifacts() {
    let dir = fixture("basic");
    let report = tfmigrate::migrate(&options(dir.path())).unwrap();

    let framework_path = dir.path().join("internal/framework/provider.go");
    assert_eq!(
        report.written,
        [
            framework_path.clone(),
            dir.path().join("main.go"),
            dir.path().join("go.mod")
        ]
    );
    assert!(!report.dry_run);

    let framework = read(&framework_path);
    validate("framework", &framework).unwrap();
    assert!(framework.starts_with("package framework\n"));
    assert!(framework.contains("\"github.com/hashicorp/terraform-plugin-framework/types\""));
    assert!(framework.contains("\"token\": schema.StringAttribute{"));
    assert!(framework.contains("Description: \"API token\","));
    assert!(framework.contains("\"tags\": schema.ListAttribute{"));
    assert!(framework.contains("ElementType: types.StringType,"));
    assert!(framework.contains("\"retry\": schema.ListNestedBlock{"));
    assert!(framework.contains("\"attempts\": schema.Int64Attribute{"));
    assert!(framework.contains("response.TypeName = \"acme\""));
    // resources stay on the SDK side
    assert!(!framework.contains("acme_widget"));

    let main = read(dir.path().join("main.go"));
    validate("main.go", &main).unwrap();
    assert!(main.starts_with("//go:build !nomain\n\npackage main\n"));
    assert!(main.contains("\t\"github.com/acme/terraform-provider-acme/internal/framework\"\n"));
    assert!(main.contains("primary := provider.Provider()"));
    assert!(main.contains("providerserver.NewProtocol5(framework.New(primary)),"));
    assert!(main.contains("\"registry.terraform.io/acme/acme\","));
    assert!(main.contains(
        "//go:generate go run github.com/hashicorp/terraform-plugin-docs/cmd/tfplugindocs generate"
    ));
    assert!(!main.contains("plugin.Serve"));

    assert_eq!(
        read(dir.path().join("go.mod")),
        "module github.com/acme/terraform-provider-acme\n\
         \n\
         go 1.21\n\
         \n\
         require (\n\
         \tgithub.com/hashicorp/terraform-plugin-sdk/v2 v2.34.0\n\
         \tgithub.com/hashicorp/terraform-plugin-framework v1.17.0\n\
         \tgithub.com/hashicorp/terraform-plugin-mux v0.21.0\n\
         \tgithub.com/hashicorp/terraform-plugin-go v0.29.0\n\
         )\n"
    );
    assert_eq!(report.requires.len(), 3);
}

#[test]
fn migrate_twice_is_stable() {
    let dir = fixture("basic");
    tfmigrate::migrate(&options(dir.path())).unwrap();
    let framework = read(dir.path().join("internal/framework/provider.go"));
    let main = read(dir.path().join("main.go"));

    let again = tfmigrate::migrate(&options(dir.path())).unwrap();
    assert!(again.requires.is_empty());
    assert_eq!(again.written.len(), 2);
    assert_eq!(read(dir.path().join("internal/framework/provider.go")), framework);
    assert_eq!(read(dir.path().join("main.go")), main);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = fixture("basic");
    let main_before = read(dir.path().join("main.go"));
    let gomod_before = read(dir.path().join("go.mod"));

    let report = tfmigrate::migrate(&Options {
        dry_run: true,
        ..options(dir.path())
    })
    .unwrap();

    assert!(report.dry_run);
    assert!(report.written.is_empty());
    assert_eq!(report.requires.len(), 3);
    assert_eq!(report.notes.last().map(String::as_str), Some("dry-run (no files written)"));
    assert_eq!(read(dir.path().join("main.go")), main_before);
    assert_eq!(read(dir.path().join("go.mod")), gomod_before);
    assert!(!dir.path().join("internal/framework").exists());
}

#[test]
fn migrate_follows_variables_and_helpers() {
    let dir = fixture("indirect");
    let report = tfmigrate::migrate(&options(dir.path())).unwrap();
    assert_eq!(report.provider_name, "acme");
    assert_eq!(report.registry_address, "registry.terraform.io/acme/acme");
    assert_eq!(report.attributes, 2);
    assert_eq!(report.blocks, 0);

    let framework = read(dir.path().join("internal/framework/provider.go"));
    assert!(framework.contains("\"labels\": schema.MapAttribute{"));
    assert!(framework.contains("\"Default labels\""));
    assert!(framework.contains("\"region\": schema.StringAttribute{"));
    assert!(framework.contains("Blocks: map[string]schema.Block{},"));

    let main = read(dir.path().join("main.go"));
    assert!(main.contains(
        "\tacme \"github.com/acme/terraform-provider-acme/v2/internal/provider\"\n"
    ));
    assert!(main.contains("\"github.com/acme/terraform-provider-acme/v2/internal/framework\""));
    assert!(main.contains("primary := acme.Provider()"));

    // SDK below the cutoff selects the legacy bundle
    let gomod = read(dir.path().join("go.mod"));
    assert!(
        gomod.contains("require github.com/hashicorp/terraform-plugin-go v0.14.2 // indirect\n")
    );
    assert!(gomod.contains("\tgithub.com/hashicorp/terraform-plugin-framework v1.0.0\n"));
    assert!(gomod.contains("\tgithub.com/hashicorp/terraform-plugin-mux v0.8.0\n"));
    assert!(gomod.ends_with(")\n"));
    assert_eq!(
        report.requires[0],
        "upgrade github.com/hashicorp/terraform-plugin-go v0.10.0 -> v0.14.2"
    );
}

#[test]
fn nested_block_fails_before_writing() {
    let dir = fixture("nested");
    let main_before = read(dir.path().join("main.go"));

    let err = tfmigrate::check(&options(dir.path())).unwrap_err();
    assert!(
        matches!(&err, MigrateError::Resolve(ResolveError::NestedBlock { attribute, nested })
            if attribute == "assume_role" && nested == "session"),
        "{err}"
    );

    assert!(tfmigrate::migrate(&options(dir.path())).is_err());
    assert_eq!(read(dir.path().join("main.go")), main_before);
    assert!(!dir.path().join("internal/framework").exists());
}

#[test]
fn underivable_registry_is_note_in_check_and_error_in_migrate() {
    let dir = fixture("gitlab");

    let report = tfmigrate::check(&options(dir.path())).unwrap();
    assert_eq!(report.provider_name, "acme");
    assert_eq!(report.registry_address, "");
    assert!(
        report
            .notes
            .iter()
            .any(|n| n.starts_with("registry address cannot be derived"))
    );

    let err = tfmigrate::migrate(&options(dir.path())).unwrap_err();
    assert!(matches!(err, MigrateError::Derivation { .. }), "{err}");
    assert!(err.to_string().contains("--registry-address"));

    let report = tfmigrate::migrate(&Options {
        registry_address: Some("registry.terraform.io/acme/acme".into()),
        ..options(dir.path())
    })
    .unwrap();
    assert_eq!(report.registry_address, "registry.terraform.io/acme/acme");
    // provider package at provider/ puts the framework at the module root
    let main = read(dir.path().join("main.go"));
    assert!(main.contains("\"gitlab.com/acme/terraform-provider-acme/framework\""));
    assert!(dir.path().join("framework/provider.go").is_file());
}

#[test]
fn project_config_is_loaded() {
    let dir = fixture("basic");
    let config_dir = dir.path().join(".tfmigrate");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[naming]\nprovider_name = \"widgets\"\n\n[output]\ngofmt = \"never\"\n",
    )
    .unwrap();

    let report = tfmigrate::check(&Options::new(dir.path())).unwrap();
    assert_eq!(report.provider_name, "widgets");
    assert_eq!(report.notes, ["registry address derived from module path"]);
}

#[test]
fn flags_override_config() {
    let dir = fixture("basic");
    let mut config = offline();
    config.naming.provider_name = Some("widgets".into());
    let report = tfmigrate::check(&Options {
        provider_name: Some("gadgets".into()),
        config: Some(config),
        ..Options::new(dir.path())
    })
    .unwrap();
    assert_eq!(report.provider_name, "gadgets");
}

#[test]
fn main_without_provider_reference() {
    let dir = fixture("basic");
    fs::write(dir.path().join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
    let err = tfmigrate::check(&options(dir.path())).unwrap_err();
    assert!(matches!(err, MigrateError::ProviderNotReferenced(_)), "{err}");
}

#[test]
fn missing_module_root() {
    let dir = TempDir::new().unwrap();
    let err = tfmigrate::check(&options(dir.path())).unwrap_err();
    assert!(matches!(err, MigrateError::ModuleRootNotFound(_)), "{err}");
    assert!(err.to_string().starts_with("go.mod not found from"));
}
