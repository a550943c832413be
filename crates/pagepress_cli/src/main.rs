//! `pagepress`: converts exported page bundles into static-site Markdown.
mod bundles;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use pagepress_engine::{run_batch, BatchSummary, Config, DEFAULT_CONFIG_FILE};
use pagepress_logging::{press_error, press_info};

use bundles::load_bundles;

#[derive(Parser)]
#[command(name = "pagepress", version, about)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Directory of exported page bundles (`*.json`).
    #[arg(short, long)]
    input: PathBuf,
    /// Output root; overrides `content.folder`.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    pagepress_logging::initialize(level, cli.log_file.as_deref());

    match run(&cli) {
        Ok(summary) => {
            println!(
                "{} written, {} skipped, {} failed",
                summary.written.len(),
                summary.skipped.len(),
                summary.failed.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            press_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Page-level failures end up in the summary; only setup problems are errors.
fn run(cli: &Cli) -> Result<BatchSummary> {
    let mut config = Config::load(&cli.config)?;
    if let Some(output) = &cli.output {
        config.content.folder = output.clone();
    }
    let assembler = config
        .build_assembler()
        .context("invalid configuration")?;

    let loaded = load_bundles(&cli.input)?;
    press_info!(
        "Converting {} pages into {}",
        loaded.bundles.len(),
        assembler.output_root().display()
    );

    let mut summary = run_batch(&assembler, loaded.bundles);
    summary
        .failed
        .extend(loaded.unreadable.iter().map(|path| path.display().to_string()));
    Ok(summary)
}
