//! Database schema to PlantUML diagram tool.
//!
//! Connects to the MySQL database named by the `DATABASE_*` environment
//! variables, reads its tables, columns and keys from `INFORMATION_SCHEMA`,
//! and writes an entity-relationship diagram to standard output.
//!
//! # Security Guarantees
//! - Read-only database operations only
//! - Password never logged or echoed in errors
//! - Nothing is written to disk

use anyhow::Context;
use clap::{Args, Parser, ValueEnum};
use erdump_core::{
    DatabaseConfig, ErdumpError, MetadataSource, MySqlSource, OutputFormat, RenderOptions,
    generate_diagram, init_logging,
};
use std::process::ExitCode;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "erdump")]
#[command(about = "Dump a MySQL schema as a PlantUML entity-relationship diagram")]
#[command(version)]
#[command(long_about = "
erdump - MySQL schema to PlantUML

Reads tables, columns and key usage from INFORMATION_SCHEMA and prints an
entity-relationship diagram on standard output. Logs go to standard error.

REQUIRED ENVIRONMENT:
  DATABASE_HOST       Server host
  DATABASE_PORT       Server port
  DATABASE_NAME       Database to connect to; also the schema to scan
  DATABASE_USERNAME   Login user
  DATABASE_PASSWORD   Login password

EXAMPLES:
  erdump > schema.puml
  erdump --annotate-keys --full-types | plantuml -pipe > schema.png
  erdump --format json > schema.json
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Plantuml)]
    format: FormatArg,

    /// Mark key columns
    #[arg(
        long,
        help = "Append <<PK>>, <<FK>>, <<UK>> and <<AI>> markers to key columns"
    )]
    annotate_keys: bool,

    /// Show full column types
    #[arg(
        long,
        help = "Show full column types such as varchar(255) instead of varchar"
    )]
    full_types: bool,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// PlantUML entity diagram
    Plantuml,
    /// JSON snapshot of the collected metadata
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Plantuml => Self::PlantUml,
            FormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    const fn render_options(&self) -> RenderOptions {
        RenderOptions {
            annotate_keys: self.annotate_keys,
            full_types: self.full_types,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// The single stderr line shown for a failed run, with the full context chain
fn failure_message(error: &anyhow::Error) -> String {
    format!("Error: {:#}", error)
}

/// Loads configuration, connects, renders, and prints the document
async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = DatabaseConfig::from_env().context("Cannot start without database settings")?;
    info!("Target: {}", config);

    let source = MySqlSource::connect(&config).await?;
    let result = render_schema(&source, config.schema(), cli).await;
    source.close().await;

    let document = result?;
    write_stdout(&document).await?;
    Ok(())
}

async fn render_schema(
    source: &dyn MetadataSource,
    schema: &str,
    cli: &Cli,
) -> anyhow::Result<String> {
    source
        .verify_access()
        .await
        .context("Metadata views are not readable")?;

    let document = generate_diagram(source, schema, cli.format.into(), cli.render_options())
        .await
        .with_context(|| format!("Failed to introspect schema '{}'", schema))?;

    info!(
        "✓ Rendered {} output ({} bytes)",
        OutputFormat::from(cli.format),
        document.len()
    );
    Ok(document)
}

/// Writes the whole document in one go so a failed run never prints a
/// partial diagram
async fn write_stdout(document: &str) -> erdump_core::Result<()> {
    let mut stdout = tokio::io::stdout();
    let io_error = |e| ErdumpError::Io {
        context: "Failed to write diagram to stdout".to_string(),
        source: e,
    };

    stdout
        .write_all(document.as_bytes())
        .await
        .map_err(io_error)?;
    stdout.flush().await.map_err(io_error)?;
    Ok(())
}
