//! CLI entry point for rr.
//!
//! This binary inspects the association declarations of a resource manifest
//! and follows `belongs_to` pointers against fixture data.
//!
//! # Usage
//!
//! ```bash
//! rr [OPTIONS] <COMMAND>
//!
//! # List every class and its associations
//! rr --manifest resources.json inspect
//!
//! # Show how an association resolves for one record
//! rr resolve --class Asset --association owner --record '{"owner_id": 1, "owner_type": "Company"}'
//!
//! # Load the related record from fixtures
//! rr fetch --class Post --association author --record '{"author_id": 7}' --fixtures fixtures.json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use rr_core::{Attributes, Config};
use rr_reflection::{
    Finder, FixtureTransport, Manifest, Namespace, ReflectionSummary, Resource, ResourceClass,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Inspect and resolve associations between remote resource classes.
#[derive(Parser)]
#[command(name = "rr", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the declaration manifest.
    #[arg(short, long, global = true, env = "RR_MANIFEST", default_value = "rr.json")]
    manifest: Utf8PathBuf,

    /// Path to a JSON configuration file.
    #[arg(short, long, global = true, env = "RR_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List declared associations.
    Inspect {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Only show this class.
        #[arg(long)]
        class: Option<String>,
    },

    /// Show how an association resolves for a record.
    Resolve {
        #[command(flatten)]
        target: Target,
    },

    /// Load the related record from a fixture file.
    Fetch {
        #[command(flatten)]
        target: Target,

        /// Fixture file (`{"Class": [{...}, ...]}`).
        #[arg(long)]
        fixtures: Utf8PathBuf,
    },
}

/// A record and one of its class's associations.
#[derive(clap::Args)]
struct Target {
    /// Class of the record.
    #[arg(long)]
    class: String,

    /// Association to follow.
    #[arg(short, long)]
    association: String,

    /// Record attributes as a JSON object.
    #[arg(short, long, default_value = "{}")]
    record: String,
}

/// Output format for `inspect`.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned text.
    Text,
    /// JSON.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default. Logs go
/// to stderr so command output stays parseable.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Loads the configuration file, or the defaults when none is given.
fn load_config(cli: &Cli) -> color_eyre::Result<Config> {
    match &cli.config {
        Some(path) => Config::from_path(path).wrap_err("Failed to load configuration"),
        None => Ok(Config::default()),
    }
}

/// Loads the manifest and defines its classes.
fn load_namespace(cli: &Cli, config: &Config) -> color_eyre::Result<Namespace> {
    info!(manifest = %cli.manifest, "Loading manifest");

    let manifest = Manifest::from_path(&cli.manifest).wrap_err("Failed to read manifest")?;
    manifest
        .load(&config.resolver)
        .wrap_err_with(|| format!("Invalid manifest {}", cli.manifest))
}

/// Looks up a class by name.
fn find_class<'a>(namespace: &'a Namespace, name: &str) -> color_eyre::Result<&'a Arc<ResourceClass>> {
    namespace
        .get(name)
        .ok_or_else(|| eyre!("Class '{name}' is not declared in the manifest"))
}

/// Builds a resource of `class` from the `--record` JSON.
fn parse_record(class: &Arc<ResourceClass>, record: &str) -> color_eyre::Result<Resource> {
    let value: serde_json::Value =
        serde_json::from_str(record).wrap_err("Failed to parse --record")?;
    let attributes =
        Attributes::from_value(value).ok_or_else(|| eyre!("--record must be a JSON object"))?;
    Ok(Resource::new(Arc::clone(class), attributes))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Lists classes and their associations.
fn run_inspect(
    namespace: &Namespace,
    format: OutputFormat,
    only: Option<&str>,
) -> color_eyre::Result<()> {
    let classes = match only {
        Some(name) => vec![find_class(namespace, name)?],
        None => namespace.classes(),
    };

    let reports: Vec<ClassReport<'_>> = classes
        .into_iter()
        .map(|class| ClassReport {
            name: class.name(),
            superclass: class.superclass(),
            associations: class.describe(),
        })
        .collect();

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .wrap_err("Failed to serialize JSON")?;
            writeln!(handle, "{json}")?;
        }
        OutputFormat::Text => {
            for report in &reports {
                write_class_report(&mut handle, report)?;
            }
        }
    }

    Ok(())
}

/// Shows the names an association derives for one record.
fn run_resolve(namespace: &Namespace, target: &Target) -> color_eyre::Result<()> {
    let class = find_class(namespace, &target.class)?;
    let record = parse_record(class, &target.record)?;
    let reflection = class.reflect_on_association(&target.association).ok_or_else(|| {
        eyre!(
            "{} has no association named '{}'",
            target.class,
            target.association
        )
    })?;

    let class_name = reflection.class_name(Some(&record))?;
    let resolved = reflection.klass(namespace, Some(&record))?;
    let foreign_key = reflection.foreign_key();
    let id = record
        .get(foreign_key)
        .map_or_else(|| "(absent)".to_owned(), ToString::to_string);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "association:  {}", reflection.name())?;
    writeln!(handle, "macro:        {}", reflection.macro_kind())?;
    writeln!(handle, "class name:   {class_name}")?;
    writeln!(handle, "resolves to:  {}", resolved.name())?;
    writeln!(handle, "foreign key:  {foreign_key} = {id}")?;
    writeln!(handle, "foreign type: {}", reflection.foreign_type())?;

    Ok(())
}

/// Follows an association against fixture data.
fn run_fetch(
    namespace: &Namespace,
    config: &Config,
    target: &Target,
    fixtures: &Utf8Path,
) -> color_eyre::Result<()> {
    let class = find_class(namespace, &target.class)?;
    let record = parse_record(class, &target.record)?;

    let transport = FixtureTransport::from_path(fixtures, config.finder.primary_key.as_str())
        .wrap_err("Failed to load fixtures")?;
    let finder = Finder::new(namespace, &transport).with_config(config.finder.clone());

    let related = finder.related(&record, &target.association)?;
    info!(requests = transport.requests().len(), "Fetch complete");

    let output = match related {
        Some(resource) => serde_json::to_string_pretty(resource.attributes())
            .wrap_err("Failed to serialize JSON")?,
        None => "null".to_owned(),
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{output}")?;

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// One class in `inspect` output.
#[derive(Serialize)]
struct ClassReport<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    superclass: Option<&'a str>,
    associations: Vec<ReflectionSummary>,
}

/// Writes one class as aligned text.
fn write_class_report(out: &mut impl Write, report: &ClassReport<'_>) -> std::io::Result<()> {
    match report.superclass {
        Some(superclass) => writeln!(out, "{} < {superclass}", report.name)?,
        None => writeln!(out, "{}", report.name)?,
    }

    if report.associations.is_empty() {
        writeln!(out, "  (no associations)")?;
    }

    for summary in &report.associations {
        let class_name = summary.class_name.as_deref().unwrap_or("<polymorphic>");
        writeln!(
            out,
            "  {:<16} {:<11} {:<16} {:<16} {}",
            summary.name,
            summary.macro_kind.label(),
            class_name,
            summary.foreign_key,
            summary.foreign_type
        )?;
    }

    writeln!(out)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Load configuration and manifest
    let config = load_config(&cli)?;
    let namespace = load_namespace(&cli, &config)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Inspect { format, class } => run_inspect(&namespace, *format, class.as_deref()),
        Commands::Resolve { target } => run_resolve(&namespace, target),
        Commands::Fetch { target, fixtures } => run_fetch(&namespace, &config, target, fixtures),
    }
}
