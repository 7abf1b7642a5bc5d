//! Markdown assembly of selected files

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::walker::FileEntry;

/// Language hint for a fenced code block, chosen by file suffix
pub fn language_hint(name: &str) -> &'static str {
    const TABLE: &[(&str, &str)] = &[
        (".js", "javascript"),
        (".json", "json"),
        (".env", "bash"),
        (".gitignore", "bash"),
        (".sh", "bash"),
        (".md", "markdown"),
    ];

    TABLE
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, lang)| *lang)
        .unwrap_or("")
}

/// Body of a file block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    /// File text as read
    Content(String),
    /// Inline error text standing in for an unreadable file
    ReadError(String),
}

impl BlockBody {
    pub fn text(&self) -> &str {
        match self {
            Self::Content(s) | Self::ReadError(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ReadError(_))
    }
}

/// One file rendered as a heading plus fenced code block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub label: String,
    pub language: &'static str,
    pub body: BlockBody,
}

impl Block {
    pub fn render(&self) -> String {
        format!(
            "\n## File: {}\n```{}\n{}\n```\n",
            self.label,
            self.language,
            self.body.text()
        )
    }
}

/// The assembled document: a title and file blocks in traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Title heading line(s) that open the document
    pub fn header(&self) -> String {
        format!("# {}\n\n", self.title)
    }

    /// Rendered pieces in order: the header, then each block
    pub fn segments(&self) -> Vec<String> {
        std::iter::once(self.header())
            .chain(self.blocks.iter().map(Block::render))
            .collect()
    }

    pub fn render(&self) -> String {
        self.segments().concat()
    }

    pub fn error_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.body.is_error()).count()
    }
}

/// Read one file into a block, embedding any read failure in the body
pub fn read_block(root: &Path, entry: &FileEntry) -> Block {
    let label = entry.label();
    debug!("Processing file: {}", label);

    let body = match fs::read_to_string(root.join(entry.rel_path())) {
        Ok(content) => BlockBody::Content(content),
        Err(e) => {
            let msg = format!("Error reading file {}: {}", label, e);
            warn!("{}", msg);
            BlockBody::ReadError(msg)
        }
    };

    Block {
        language: language_hint(&label),
        label,
        body,
    }
}

/// Assemble every entry, in the given order, under `title`
pub fn assemble(root: &Path, entries: &[FileEntry], title: impl Into<String>) -> Document {
    Document {
        title: title.into(),
        blocks: entries.iter().map(|entry| read_block(root, entry)).collect(),
    }
}

/// Default title for a project rooted at `root`
pub fn default_title(root: &Path) -> String {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Project".to_string());
    format!("{} - Full Codebase", name)
}
