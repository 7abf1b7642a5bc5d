//! Output of document parts as timestamped Markdown files

use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clock::RunStamp;
use crate::splitter::Part;

/// Writes parts into an output directory under a shared run stamp
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    prefix: String,
    create_dir: bool,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            create_dir: false,
        }
    }

    /// Create the output directory instead of failing when it is missing
    pub fn create_dir(mut self, create: bool) -> Self {
        self.create_dir = create;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for `part`, e.g. `FULL_PROJECT_20240131_0905_part_2_of_3.md`
    pub fn file_name(&self, stamp: &RunStamp, part: &Part) -> String {
        if part.total == 1 {
            format!("{}_{}.md", self.prefix, stamp)
        } else {
            format!("{}_{}_part_{}_of_{}.md", self.prefix, stamp, part.index, part.total)
        }
    }

    /// Whether `path` is a file this writer produces, from any run
    ///
    /// Matches `{prefix}_*.md` directly inside the output directory only.
    pub fn is_own_output(&self, path: &Path) -> bool {
        if path.parent() != Some(self.dir.as_path()) {
            return false;
        }
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&format!("{}_", self.prefix)) && n.ends_with(".md"))
    }

    /// Write every part, returning the paths in part order
    ///
    /// Files with the same name are overwritten.
    pub fn write(&self, stamp: &RunStamp, parts: &[Part]) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            if self.create_dir {
                fs::create_dir_all(&self.dir)
                    .context(format!("Failed to create output directory: {}", self.dir.display()))?;
            } else {
                return Err(eyre::eyre!("Output directory does not exist: {}", self.dir.display()));
            }
        }

        let mut written = Vec::with_capacity(parts.len());
        for part in parts {
            let path = self.dir.join(self.file_name(stamp, part));
            fs::write(&path, &part.content).context(format!("Failed to write {}", path.display()))?;
            if part.total == 1 {
                info!("Created single file: {}", path.display());
            } else {
                info!("Created part {} of {}: {}", part.index, part.total, path.display());
            }
            written.push(path);
        }

        Ok(written)
    }
}
