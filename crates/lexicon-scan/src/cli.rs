use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::report::{render_json, render_skipped, render_text};
use crate::scanner::ScanOutcome;

#[derive(Debug, Parser)]
#[command(
    name = "find-untranslated",
    about = "Flag user-facing text in front-end sources that bypasses translation",
    version
)]
pub struct Cli {
    /// TOML file overriding search roots, extensions, and patterns.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when any finding is reported.
    #[arg(long)]
    pub fail_on_findings: bool,
}

/// Install a stderr `fmt` subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli)
}

/// Scan with `config` and return the raw outcome.
pub fn execute(config: &ScanConfig) -> Result<ScanOutcome> {
    config.scanner()?.scan(&config.roots, &config.extensions)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    tracing::debug!(roots = ?config.roots, extensions = ?config.extensions, "starting scan");

    let outcome = execute(&config)?;
    if cli.json {
        println!("{}", render_json(&outcome)?);
    } else {
        let base = std::env::current_dir().ok();
        print!("{}", render_text(&outcome.report, base.as_deref()));
        print!("{}", render_skipped(&outcome.skipped, base.as_deref()));
        println!("Files scanned: {}", outcome.files_scanned);
    }

    if cli.fail_on_findings && !outcome.report.is_empty() {
        return Err(ScanError::exit(
            1,
            format!(
                "{} untranslated string(s) in {} file(s)",
                outcome.report.total_findings(),
                outcome.report.file_count()
            ),
        ));
    }
    Ok(())
}
