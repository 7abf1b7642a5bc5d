//! CLI argument parsing for projectdoc

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, SplitMode};

#[derive(Parser, Debug)]
#[command(name = "pd")]
#[command(author, version, about = "Flatten a project into token-budgeted Markdown", long_about = None)]
pub struct Cli {
    /// Project root to document (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory, relative to the root unless absolute (default: docs)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Estimated tokens per output file (default: 4000)
    #[arg(short, long)]
    pub tokens_per_part: Option<usize>,

    /// Where parts may be cut
    #[arg(short, long, value_enum)]
    pub split: Option<SplitMode>,

    /// Create the output directory if it does not exist
    #[arg(long)]
    pub create_output_dir: bool,

    /// Report what would be written without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(tokens) = self.tokens_per_part {
            config.split.tokens_per_part = tokens;
        }
        if let Some(mode) = self.split {
            config.split.mode = mode;
        }
        if self.create_output_dir {
            config.output.create_dir = true;
        }
    }
}
