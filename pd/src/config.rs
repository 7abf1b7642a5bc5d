//! Configuration for projectdoc

use eyre::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name, looked up in the project root
pub const LOCAL_CONFIG_FILE: &str = ".projectdoc.yml";

/// Main projectdoc configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which files are collected
    pub filters: FilterConfig,

    /// Where and how output files are written
    pub output: OutputConfig,

    /// Token budget and split strategy
    pub split: SplitConfig,

    /// Document title; derived from the root directory name when unset
    pub title: Option<String>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: Option<String>,
}

/// File selection filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Directory names pruned before descent
    pub exclude_dirs: BTreeSet<String>,

    /// File name suffixes that select a file
    pub include_suffixes: Vec<String>,

    /// File names never selected, even when a suffix matches
    pub exclude_files: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: [
                "node_modules",
                ".git",
                "dist",
                "build",
                "coverage",
                "__pycache__",
                ".pytest_cache",
                ".vscode",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            include_suffixes: [".js", ".md", ".sh", ".env", ".gitignore"]
                .into_iter()
                .map(String::from)
                .collect(),
            exclude_files: ["package-lock.json", "package.json"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Output location and naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory, relative to the project root unless absolute
    pub dir: PathBuf,

    /// File name prefix
    pub prefix: String,

    /// Create the output directory when missing
    pub create_dir: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(crate::DEFAULT_OUTPUT_DIR),
            prefix: crate::DEFAULT_PREFIX.to_string(),
            create_dir: false,
        }
    }
}

/// How the assembled document is split into parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Estimated tokens allowed per output file
    pub tokens_per_part: usize,

    /// Characters counted as one token
    pub chars_per_token: usize,

    /// Where parts may be cut
    pub mode: SplitMode,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            tokens_per_part: crate::DEFAULT_TOKENS_PER_PART,
            chars_per_token: crate::DEFAULT_CHARS_PER_TOKEN,
            mode: SplitMode::default(),
        }
    }
}

/// Split strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Equal character slices; may cut through a file block
    #[default]
    Offset,
    /// Whole file blocks packed into each part
    Blocks,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.split.tokens_per_part == 0 {
            return Err(eyre::eyre!("split.tokens_per_part must be greater than zero"));
        }
        if self.split.chars_per_token == 0 {
            return Err(eyre::eyre!("split.chars_per_token must be greater than zero"));
        }
        if self.filters.include_suffixes.is_empty() {
            return Err(eyre::eyre!("filters.include_suffixes must not be empty"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise `<root>/.projectdoc.yml`, then
    /// `~/.config/projectdoc/projectdoc.yml`, then built-in defaults.
    pub fn load(config_path: Option<&PathBuf>, root: &Path) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::search_paths(root) {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        Ok(Self::default())
    }

    /// Implicit config locations, in lookup order
    pub fn search_paths(root: &Path) -> Vec<PathBuf> {
        std::iter::once(root.join(LOCAL_CONFIG_FILE))
            .chain(dirs::config_dir().map(|p| p.join("projectdoc").join("projectdoc.yml")))
            .collect()
    }

    /// Load the log level from the same file `load` would pick
    ///
    /// Used before logging is initialised, so failures are silent.
    pub fn load_log_level(config_path: Option<&PathBuf>, root: &Path) -> Option<String> {
        match config_path {
            Some(path) => Self::log_level_from(std::slice::from_ref(path)),
            None => Self::log_level_from(&Self::search_paths(root)),
        }
    }

    fn log_level_from(paths: &[PathBuf]) -> Option<String> {
        paths
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
