//! Directory traversal and file selection

use eyre::{Context, Result};
use log::debug;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::FilterConfig;

/// A selected file, identified by its path relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    rel_path: PathBuf,
}

impl FileEntry {
    pub fn new(rel_path: impl Into<PathBuf>) -> Self {
        Self {
            rel_path: rel_path.into(),
        }
    }

    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    /// Label used in headings and error messages
    pub fn label(&self) -> String {
        self.rel_path.display().to_string()
    }
}

impl FilterConfig {
    /// Whether a directory with this name is pruned
    pub fn excludes_dir(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }

    /// Whether a file with this name is selected
    pub fn includes_file(&self, name: &str) -> bool {
        self.include_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())) && !self.exclude_files.contains(name)
    }
}

/// Files of a directory come before its subdirectories, then by name
fn visit_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Collect files under `root` that pass `filters`, in traversal order
///
/// Excluded directories are never descended into. The root itself is always
/// walked, whatever its name. Any traversal error is returned.
pub fn collect_files(root: &Path, filters: &FilterConfig) -> Result<Vec<FileEntry>> {
    collect_files_except(root, filters, |_| false)
}

/// Like [`collect_files`], additionally dropping files for which `skip` holds
///
/// Used to keep a run's own earlier output out of its input.
pub fn collect_files_except(root: &Path, filters: &FilterConfig, skip: impl Fn(&Path) -> bool) -> Result<Vec<FileEntry>> {
    debug!("collect_files: root={}", root.display());

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by(visit_order)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !(e.file_type().is_dir() && e.file_name().to_str().is_some_and(|n| filters.excludes_dir(n)))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.context(format!("Failed to walk directory tree: {}", root.display()))?;
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !filters.includes_file(&name) {
            continue;
        }
        if skip(entry.path()) {
            debug!("collect_files: skipped {}", entry.path().display());
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .context(format!("Path escaped project root: {}", entry.path().display()))?;
        debug!("collect_files: selected {}", rel_path.display());
        files.push(FileEntry::new(rel_path));
    }

    Ok(files)
}
