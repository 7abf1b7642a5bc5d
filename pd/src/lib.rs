//! projectdoc - flatten a project into token-budgeted Markdown
//!
//! Walks a project tree, wraps each selected file in a fenced code block,
//! and writes the result to `<root>/docs/` as one file or several parts
//! sized by an estimated token budget.
//!
//! # Output
//!
//! ```text
//! docs/
//! ├── FULL_PROJECT_20240131_0905.md                # fits the budget
//! ├── FULL_PROJECT_20240131_0910_part_1_of_3.md    # or split into parts
//! ├── FULL_PROJECT_20240131_0910_part_2_of_3.md
//! └── FULL_PROJECT_20240131_0910_part_3_of_3.md
//! ```
//!
//! # Example
//!
//! ```ignore
//! use projectdoc::{RunOptions, SystemClock, config::Config};
//!
//! let options = RunOptions::new(".", Config::default());
//! let report = projectdoc::run(&options, &SystemClock)?;
//! println!("{} parts", report.parts);
//! ```

pub mod assembler;
pub mod cli;
pub mod clock;
pub mod config;
pub mod splitter;
pub mod walker;
pub mod writer;

use eyre::Result;
use log::info;
use std::path::{Path, PathBuf};

pub use assembler::{Block, BlockBody, Document, assemble};
pub use clock::{Clock, FixedClock, RunStamp, SystemClock};
pub use splitter::{Budget, Part, SplitPlan};
pub use walker::{FileEntry, collect_files};
pub use writer::OutputWriter;

use crate::config::Config;

/// Default estimated tokens per output file
pub const DEFAULT_TOKENS_PER_PART: usize = 4000;

/// Default characters counted as one token
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Default output directory, relative to the project root
pub const DEFAULT_OUTPUT_DIR: &str = "docs";

/// Default output file name prefix
pub const DEFAULT_PREFIX: &str = "FULL_PROJECT";

/// Inputs for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub root: PathBuf,
    pub config: Config,
    /// Assemble and split, but write nothing
    pub dry_run: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            dry_run: false,
        }
    }

    /// Output directory, resolved against the root when relative
    pub fn output_dir(&self) -> PathBuf {
        resolve(&self.root, &self.config.output.dir)
    }
}

fn resolve(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() { dir.to_path_buf() } else { root.join(dir) }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stamp: RunStamp,
    pub files: Vec<FileEntry>,
    /// Files whose block holds an inline read error
    pub read_errors: usize,
    pub estimated_tokens: usize,
    pub parts: usize,
    pub output_dir: PathBuf,
    /// Empty on a dry run
    pub written: Vec<PathBuf>,
}

/// Walk, assemble, split and write
///
/// Files the writer produced on earlier runs are left out of the input.
pub fn run(options: &RunOptions, clock: &dyn Clock) -> Result<RunReport> {
    let config = &options.config;
    config.validate()?;

    let stamp = RunStamp::from_clock(clock);
    info!("Starting documentation for {} (run {})", options.root.display(), stamp);

    let output_dir = options.output_dir();
    let writer = OutputWriter::new(&output_dir, config.output.prefix.clone()).create_dir(config.output.create_dir);
    let files = walker::collect_files_except(&options.root, &config.filters, |p| writer.is_own_output(p))?;
    info!("Found {} files to document", files.len());

    let title = config
        .title
        .clone()
        .unwrap_or_else(|| assembler::default_title(&options.root));
    let document = assemble(&options.root, &files, title);

    let budget = Budget {
        tokens_per_part: config.split.tokens_per_part,
        chars_per_token: config.split.chars_per_token,
    };
    let plan = splitter::plan(&document.segments(), budget, config.split.mode);
    info!("Total tokens: {}", plan.estimated_tokens);
    info!("Will split into {} files", plan.parts.len());

    let written = if options.dry_run {
        info!("Dry run, nothing written");
        Vec::new()
    } else {
        writer.write(&stamp, &plan.parts)?
    };

    Ok(RunReport {
        stamp,
        read_errors: document.error_count(),
        files,
        estimated_tokens: plan.estimated_tokens,
        parts: plan.parts.len(),
        output_dir,
        written,
    })
}
