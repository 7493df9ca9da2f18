//! The check and migrate pipelines.
//!
//! Both share [`Project::open`]: module root, configuration, names, the
//! resolved provider schema and the entry point. `migrate` then renders
//! every artifact in memory and only writes once all of them succeeded.

use crate::config::{MigrateConfig, VendorMode};
use crate::{MigrateError, Options, Report};
use std::io::Write;
use std::path::{Path, PathBuf};
use tfmigrate_codegen::{Formatter, MuxMain, render_framework_provider, render_mux_main};
use tfmigrate_go::{
    IndexOptions, ProviderSchema, ResolveOptions, SchemaResolver, SourceIndex, SymbolTable,
    find_entrypoint,
};
use tfmigrate_gomod::{
    GoMod, GoTool, ModuleError, derive_provider_name, derive_registry_address, find_module_root,
    select_bundle,
};
use tfmigrate_schema::EntrypointInfo;

const FRAMEWORK_DIR: &str = "framework";
const FRAMEWORK_FILE: &str = "provider.go";
const DRY_RUN_NOTE: &str = "dry-run (no files written)";

/// Validate that the module can be migrated. Writes nothing.
///
/// A provider name or registry address that can neither be derived nor was
/// given is reported as a note instead of failing.
pub fn check(options: &Options) -> Result<Report, MigrateError> {
    let project = Project::open(options, false)?;
    tracing::info!(module = %project.module, "check passed");
    Ok(project.report())
}

/// Generate the framework provider, rewrite `main.go` and update `go.mod`.
pub fn migrate(options: &Options) -> Result<Report, MigrateError> {
    let mut project = Project::open(options, true)?;
    let mut report = project.report();
    let config = &project.config;

    let mut formatter = Formatter::new(config.gofmt());
    if let Some(gofmt) = &config.toolchain.gofmt {
        formatter = formatter.with_program(gofmt);
    }

    let framework_source = formatter.finish(
        &display_path(&project.root, &project.framework.file),
        render_framework_provider(&project.provider.model, &report.provider_name),
    )?;
    let main_source = formatter.finish(
        &display_path(&project.root, &project.entry.path),
        render_mux_main(&MuxMain {
            entry: &project.entry,
            framework_import: &project.framework.import,
            registry_address: &report.registry_address,
        })?,
    )?;

    let bundle = select_bundle(&project.gomod);
    let changes = project.gomod.ensure_requires(&bundle.modules());
    report.requires = changes.iter().map(ToString::to_string).collect();
    tracing::debug!(bundle = bundle.name, changes = changes.len(), "planned go.mod");

    if options.dry_run {
        report.notes.push(DRY_RUN_NOTE.to_string());
        report.dry_run = true;
        tracing::info!("dry run, nothing written");
        return Ok(report);
    }

    let gomod_source = project.gomod.to_string();
    let mut artifacts = vec![
        (project.framework.file.as_path(), framework_source.as_str()),
        (project.entry.path.as_path(), main_source.as_str()),
    ];
    if !changes.is_empty() {
        artifacts.push((project.gomod_path.as_path(), gomod_source.as_str()));
    }
    write_all(&artifacts)?;
    report.written = artifacts.iter().map(|(path, _)| path.to_path_buf()).collect();

    let download = config.download() && !options.skip_download;
    let vendor = match options.vendor.unwrap_or_else(|| config.vendor()) {
        VendorMode::On => true,
        VendorMode::Off => false,
        VendorMode::Auto => project.root.join("vendor").is_dir(),
    };
    if download || vendor {
        let go = GoTool::locate(config.toolchain.go.as_deref())?;
        if download {
            for (module, version) in bundle.required_versions(&project.gomod) {
                go.download(&project.root, module, &version)?;
            }
        }
        if vendor {
            go.vendor(&project.root)?;
        }
    }

    tracing::info!(module = %project.module, written = report.written.len(), "migration complete");
    Ok(report)
}

/// Where the generated framework package goes.
#[derive(Debug)]
struct FrameworkPackage {
    import: String,
    file: PathBuf,
}

/// Everything known about a module before rendering.
#[derive(Debug)]
struct Project {
    root: PathBuf,
    config: MigrateConfig,
    gomod_path: PathBuf,
    gomod: GoMod,
    module: String,
    provider_name: Option<String>,
    registry_address: Option<String>,
    notes: Vec<String>,
    provider: ProviderSchema,
    entry: EntrypointInfo,
    framework: FrameworkPackage,
}

impl Project {
    fn open(options: &Options, strict: bool) -> Result<Self, MigrateError> {
        let start = if options.path.as_os_str().is_empty() {
            Path::new(".")
        } else {
            options.path.as_path()
        };
        let root = find_module_root(start)?;
        tracing::debug!(root = %root.display(), "found module root");

        let config = match &options.config {
            Some(config) => config.clone(),
            None => MigrateConfig::load(&root)?,
        };

        let gomod_path = root.join("go.mod");
        let gomod = GoMod::read(&gomod_path)?;
        let module = gomod
            .module()
            .ok_or_else(|| ModuleError::MissingModule(gomod_path.clone()))?
            .to_string();

        let mut notes = Vec::new();
        let provider_name = resolve_name(
            options
                .provider_name
                .clone()
                .or_else(|| config.naming.provider_name.clone()),
            || derive_provider_name(&module),
            NameKind::Provider,
            &module,
            strict,
            &mut notes,
        )?;
        let registry_address = resolve_name(
            options
                .registry_address
                .clone()
                .or_else(|| config.naming.registry_address.clone()),
            || derive_registry_address(&module),
            NameKind::Registry,
            &module,
            strict,
            &mut notes,
        )?;

        let index = SourceIndex::scan(
            &root,
            &IndexOptions {
                exclude: config.exclude().to_vec(),
            },
        )?;
        let symbols = SymbolTable::build(&index);
        tracing::debug!(
            files = index.len(),
            functions = symbols.function_count(),
            variables = symbols.variable_count(),
            "indexed module"
        );
        let resolver = SchemaResolver::new(
            &symbols,
            ResolveOptions {
                strict_fields: config.strict_fields(),
            },
        );
        let provider = resolver.resolve_provider(&index)?;
        tracing::info!(
            path = %provider.path.display(),
            attributes = provider.model.attributes().len(),
            blocks = provider.model.blocks().len(),
            "resolved provider schema"
        );

        let entry =
            find_entrypoint(&index).ok_or_else(|| MigrateError::EntrypointNotFound(root.clone()))?;
        if !entry.references_provider() {
            return Err(MigrateError::ProviderNotReferenced(entry.path));
        }
        let framework = framework_package(&root, &module, &entry.provider_import)?;
        let imported = provider_rel(&module, &entry.provider_import).unwrap_or_default();
        if root.join(imported) != provider.dir() {
            tracing::warn!(
                import = %entry.provider_import,
                dir = %provider.dir().display(),
                "main.go imports a different package than the one declaring Provider()"
            );
        }

        Ok(Self {
            root,
            config,
            gomod_path,
            gomod,
            module,
            provider_name,
            registry_address,
            notes,
            provider,
            entry,
            framework,
        })
    }

    fn report(&self) -> Report {
        Report {
            module_root: self.root.clone(),
            main_file: Some(self.entry.path.clone()),
            framework_file: Some(self.framework.file.clone()),
            provider_name: self.provider_name.clone().unwrap_or_default(),
            registry_address: self.registry_address.clone().unwrap_or_default(),
            attributes: self.provider.model.attributes().len(),
            blocks: self.provider.model.blocks().len(),
            notes: self.notes.clone(),
            ..Report::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NameKind {
    Provider,
    Registry,
}

impl NameKind {
    fn describe(self) -> &'static str {
        match self {
            NameKind::Provider => "provider name",
            NameKind::Registry => "registry address",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            NameKind::Provider => "--provider-name",
            NameKind::Registry => "--registry-address",
        }
    }
}

/// Explicit value, else derived (with a note), else an error or a note.
fn resolve_name(
    explicit: Option<String>,
    derive: impl FnOnce() -> Option<String>,
    kind: NameKind,
    module: &str,
    strict: bool,
    notes: &mut Vec<String>,
) -> Result<Option<String>, MigrateError> {
    if let Some(value) = explicit.filter(|v| !v.is_empty()) {
        return Ok(Some(value));
    }
    if let Some(value) = derive() {
        notes.push(format!("{} derived from module path", kind.describe()));
        return Ok(Some(value));
    }
    if strict {
        return Err(MigrateError::Derivation {
            what: kind.describe(),
            module: module.to_string(),
            flag: kind.flag(),
        });
    }
    tracing::warn!(module, "{} cannot be derived", kind.describe());
    notes.push(format!(
        "{} cannot be derived from module path; pass {}",
        kind.describe(),
        kind.flag()
    ));
    Ok(None)
}

/// Module-relative directory of `import`, `""` for the module root itself.
fn provider_rel(module: &str, import: &str) -> Option<String> {
    if import == module {
        return Some(String::new());
    }
    import
        .strip_prefix(module)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(str::to_string)
}

/// `framework` next to the provider package, or under the root if the
/// provider package is the module root.
fn framework_package(
    root: &Path,
    module: &str,
    provider_import: &str,
) -> Result<FrameworkPackage, MigrateError> {
    let rel = provider_rel(module, provider_import).ok_or_else(|| {
        MigrateError::ProviderOutsideModule {
            import: provider_import.to_string(),
            module: module.to_string(),
        }
    })?;
    let parent = rel.rsplit_once('/').map(|(parent, _)| parent);
    let (import, dir) = match parent {
        Some(parent) => (
            format!("{module}/{parent}/{FRAMEWORK_DIR}"),
            root.join(parent).join(FRAMEWORK_DIR),
        ),
        None => (format!("{module}/{FRAMEWORK_DIR}"), root.join(FRAMEWORK_DIR)),
    };
    Ok(FrameworkPackage {
        import,
        file: dir.join(FRAMEWORK_FILE),
    })
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Write every artifact, or none of them.
///
/// Each file is replaced atomically. If a later write fails, the files
/// already written get their previous contents back (or are removed if they
/// did not exist) before the error is returned.
fn write_all(artifacts: &[(&Path, &str)]) -> Result<(), MigrateError> {
    let mut done: Vec<(&Path, Option<Vec<u8>>)> = Vec::new();
    for &(path, contents) in artifacts {
        let result = read_previous(path).and_then(|previous| {
            write_atomic(path, contents.as_bytes())?;
            Ok(previous)
        });
        match result {
            Ok(previous) => done.push((path, previous)),
            Err(err) => {
                roll_back(&done);
                return Err(err);
            }
        }
    }
    Ok(())
}

fn read_previous(path: &Path) -> Result<Option<Vec<u8>>, MigrateError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(MigrateError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn roll_back(done: &[(&Path, Option<Vec<u8>>)]) {
    for (path, previous) in done.iter().rev() {
        let result = match previous {
            Some(bytes) => write_atomic(path, bytes),
            None => std::fs::remove_file(path).map_err(|source| MigrateError::Io {
                path: path.to_path_buf(),
                source,
            }),
        };
        match result {
            Ok(()) => tracing::info!(path = %path.display(), "rolled back"),
            Err(err) => tracing::warn!(path = %path.display(), %err, "rollback failed"),
        }
        if previous.is_none()
            && let Some(dir) = path.parent()
        {
            // only succeeds if the directory is now empty
            let _ = std::fs::remove_dir(dir);
        }
    }
}

/// Write through a temporary file in the destination directory and rename
/// it into place. An existing file keeps its permissions.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), MigrateError> {
    let io = |source: std::io::Error| MigrateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(io)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io)?;
    file.write_all(contents).map_err(io)?;
    match std::fs::metadata(path) {
        Ok(meta) => file.as_file().set_permissions(meta.permissions()).map_err(io)?,
        Err(_) => set_default_permissions(file.as_file()).map_err(io)?,
    }
    file.persist(path).map_err(|e| io(e.error))?;
    tracing::info!(path = %path.display(), "wrote");
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
