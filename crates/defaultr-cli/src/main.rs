//! `defaultr` CLI — apply a defaults spec to JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Apply a spec to a document (stdin → stdout)
//! echo '{"Rating":3}' | defaultr apply --spec spec.json
//!
//! # File to file, pretty-printed
//! defaultr apply --spec spec.json -i review.json -o review.out.json --pretty
//!
//! # Use a pipeline operation descriptor ({"operation": ..., "spec": {...}})
//! defaultr apply --operation op.json -i review.json
//!
//! # No input at all: build a document purely from the spec
//! defaultr apply --spec spec.json < /dev/null
//!
//! # Validate a spec and print its shape
//! defaultr check --spec spec.json
//!
//! # Debug logging
//! defaultr -vv apply --spec spec.json -i review.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use defaultr_core::Defaultr;
use serde_json::Value;
use std::io::{self, Read};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "defaultr",
    version,
    about = "Fill missing JSON values from a defaults spec, never overwriting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a defaults spec to a JSON document
    Apply {
        /// Defaults spec file (a JSON object)
        #[arg(long, conflicts_with = "operation", required_unless_present = "operation")]
        spec: Option<String>,
        /// Operation descriptor file carrying the spec in its "spec" field
        #[arg(long)]
        operation: Option<String>,
        /// Input document (reads from stdin if omitted; empty input means no document)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a defaults spec and report its shape
    Check {
        /// Defaults spec file (a JSON object)
        #[arg(long)]
        spec: String,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Apply {
            spec,
            operation,
            input,
            output,
            pretty,
        } => {
            let defaultr = match (spec.as_deref(), operation.as_deref()) {
                (Some(path), _) => {
                    let spec = read_json_file(path)?;
                    Defaultr::new(&spec).with_context(|| format!("Invalid spec: {}", path))?
                }
                (None, Some(path)) => {
                    let op = read_json_file(path)?;
                    Defaultr::from_operation(&op)
                        .with_context(|| format!("Invalid operation: {}", path))?
                }
                (None, None) => anyhow::bail!("Either --spec or --operation is required"),
            };

            let text = read_input(input.as_deref())?;
            let mut document = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).context("Input is not valid JSON")?
            };

            defaultr.apply(&mut document);
            tracing::debug!("defaults applied");

            let rendered = if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { spec, json } => {
            let raw = read_json_file(&spec)?;
            let defaultr =
                Defaultr::new(&raw).with_context(|| format!("Invalid spec: {}", spec))?;
            let summary = defaultr.spec().summary();

            if json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!("Spec OK: {}", spec);
                println!("Literal keys:   {}", summary.literal_keys);
                println!("OR keys:        {}", summary.or_keys);
                println!("STAR keys:      {}", summary.star_keys);
                println!("Array outputs:  {}", summary.array_outputs);
                println!("Defaults:       {}", summary.defaults);
                println!("Depth:          {}", summary.depth);
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean JSON.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn read_json_file(path: &str) -> Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("File is not valid JSON: {}", path))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
