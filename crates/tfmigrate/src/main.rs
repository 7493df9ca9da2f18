use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tfmigrate::{Options, Report, VendorMode};
use tracing_subscriber::EnvFilter;

/// Migrate a Terraform SDKv2 provider to a muxed plugin-framework provider.
#[derive(Parser)]
#[command(name = "tfmigrate", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `TFMIGRATE_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate that the provider can be migrated
    Check(CommonArgs),

    /// Add the framework provider and mux it into main.go
    Migrate(MigrateArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Path inside the provider module
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Registry address, e.g. registry.terraform.io/acme/acme (default: derived)
    #[arg(long)]
    registry_address: Option<String>,

    /// Provider type name (default: derived)
    #[arg(long)]
    provider_name: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MigrateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Show planned changes without writing files
    #[arg(long)]
    dry_run: bool,

    /// Run `go mod vendor` afterwards (default: from config, else auto)
    #[arg(long, value_enum)]
    vendor: Option<VendorMode>,

    /// Do not run `go mod download` for the added modules
    #[arg(long)]
    skip_download: bool,
}

impl CommonArgs {
    fn options(&self) -> Options {
        Options {
            registry_address: self.registry_address.clone(),
            provider_name: self.provider_name.clone(),
            ..Options::new(&self.path)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("TFMIGRATE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn print_report(label: &str, report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("failed to serialize report")?;
        println!("{out}");
    } else {
        println!("{label} OK: {}", report.summary());
        for note in &report.notes {
            println!("  note: {note}");
        }
    }
    Ok(())
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Check(args) => {
            let report = tfmigrate::check(&args.options())?;
            print_report("check", &report, args.json)
        }
        Commands::Migrate(args) => {
            let options = Options {
                dry_run: args.dry_run,
                vendor: args.vendor,
                skip_download: args.skip_download,
                ..args.common.options()
            };
            let report = tfmigrate::migrate(&options)?;
            print_report("migrate", &report, args.common.json)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let name = match &cli.command {
        Commands::Check(_) => "check",
        Commands::Migrate(_) => "migrate",
    };
    match run(cli.command) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{name} failed: {e:#}");
            std::process::exit(1);
        }
    }
}
