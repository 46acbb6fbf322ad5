//! Bates index command line
//!
//! Entry point for indexing Bates numbers and repair order numbers.

use anyhow::Context;
use bates_cli::{issue_report, run_pages, run_text, OutputOptions};
use bates_core::{BatesExtractor, ExtractionConfig};
use clap::{Parser, Subcommand};
use shared_types::{ExportFormat, ReferencePolicy};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bates-index")]
#[command(
    version,
    about = "Index Bates numbers and repair order numbers in legal document text"
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index a paginated document (PDF text layer or form-feed separated text)
    Pages {
        input: PathBuf,

        /// Keep pages with a Bates number but no repair order numbers
        #[arg(long)]
        lenient: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Index an unpaginated text export; the Bates number comes from the filename
    Text {
        input: PathBuf,

        /// Filename to take the Bates number from (defaults to INPUT's name)
        #[arg(long)]
        filename: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Export format: CSV, anything else writes a spreadsheet
    #[arg(short, long, default_value = "xlsx")]
    format: String,

    /// Export path (defaults to <input stem>_index.<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the index rows as JSON
    #[arg(long)]
    rows_json: Option<PathBuf>,
}

impl From<OutputArgs> for OutputOptions {
    fn from(args: OutputArgs) -> Self {
        OutputOptions {
            format: ExportFormat::from_selector(&args.format),
            output: args.output,
            rows_json: args.rows_json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs go to stderr; stdout carries the run summary
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => ExtractionConfig::from_file(path)?,
        None => ExtractionConfig::default(),
    };
    let extractor =
        BatesExtractor::from_config(&config).context("Invalid extraction configuration")?;

    let summary = match args.command {
        Command::Pages {
            input,
            lenient,
            output,
        } => {
            let extractor = if lenient {
                extractor.with_policy(ReferencePolicy::Lenient)
            } else {
                extractor
            };
            run_pages(&extractor, &input, &output.into())?
        }
        Command::Text {
            input,
            filename,
            output,
        } => run_text(&extractor, &input, filename.as_deref(), &output.into())?,
    };

    if !summary.issues.is_empty() {
        eprint!("{}", issue_report(&summary.issues));
    }
    println!(
        "Wrote {} rows ({} pages indexed, {} issue pages) to {}",
        summary.rows,
        summary.indexed_pages,
        summary.issues.len(),
        summary.output.display()
    );

    Ok(())
}
