use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info};
use std::path::PathBuf;

use projectdoc::cli::Cli;
use projectdoc::config::Config;
use projectdoc::{RunOptions, SystemClock};

fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.map(|s| s.to_uppercase()).as_deref() {
        Some("TRACE") => LevelFilter::Trace,
        Some("DEBUG") => LevelFilter::Debug,
        Some("WARN") | Some("WARNING") => LevelFilter::Warn,
        Some("ERROR") => LevelFilter::Error,
        Some("INFO") | None => LevelFilter::Info,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            LevelFilter::Info
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > INFO
    env_logger::Builder::from_default_env()
        .filter_level(parse_level(cli_log_level.or(config_log_level)))
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let root: PathBuf = root
        .canonicalize()
        .context(format!("Project root not found: {}", root.display()))?;

    let config_log_level = Config::load_log_level(cli.config.as_ref(), &root);
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref(), &root).context("Failed to load configuration")?;
    cli.apply(&mut config);

    info!("projectdoc starting");

    let options = RunOptions {
        root,
        config,
        dry_run: cli.dry_run,
    };
    let report = projectdoc::run(&options, &SystemClock)?;

    println!(
        "{} Documented {} files (~{} tokens) into {} part(s)",
        "✓".green(),
        report.files.len(),
        report.estimated_tokens,
        report.parts
    );
    if report.read_errors > 0 {
        println!("{} {} file(s) could not be read; see inline errors", "!".yellow(), report.read_errors);
    }
    if options.dry_run {
        println!("Dry run: would write to {}", report.output_dir.display().to_string().cyan());
    }
    for path in &report.written {
        println!("  {}", path.display().to_string().cyan());
    }

    Ok(())
}
