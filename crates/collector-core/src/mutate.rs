use std::path::Path;
use std::sync::Arc;

use crate::error::{CollectorError, Result};
use crate::vfs::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Remove,
}

/// The list line carrying `link`.
pub fn link_line(link: &str) -> String {
    format!("- {}", link)
}

/// Append `- <link>` unless the link already appears anywhere.
pub fn insert_link(content: &str, link: &str) -> String {
    if content.contains(link) {
        return content.to_string();
    }
    if content.is_empty() {
        return link_line(link);
    }
    format!("{}\n{}", content, link_line(link))
}

/// Remove the first of `\n- <link>`, `- <link>\n`, `- <link>` found, in that
/// order. Everything else is left byte-identical.
pub fn remove_link(content: &str, link: &str) -> String {
    let line = link_line(link);
    let candidates = [format!("\n{}", line), format!("{}\n", line), line];
    for candidate in &candidates {
        if content.contains(candidate.as_str()) {
            return content.replacen(candidate.as_str(), "", 1);
        }
    }
    content.to_string()
}

/// Remove the first of `links` present in `content`.
pub fn remove_first_link(content: &str, links: &[String]) -> String {
    for link in links {
        let next = remove_link(content, link);
        if next != content {
            return next;
        }
    }
    content.to_string()
}

pub fn apply(operation: Operation, content: &str, link: &str) -> String {
    match operation {
        Operation::Insert => insert_link(content, link),
        Operation::Remove => remove_link(content, link),
    }
}

/// Applies link edits to notes through the file system's atomic `process`.
pub struct NoteMutator {
    fs: Arc<dyn FileSystem>,
}

impl NoteMutator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Returns whether the note changed.
    pub fn mutate(&self, note: &Path, link: &str, operation: Operation) -> Result<bool> {
        self.fs
            .process(note, &|content: &str| apply(operation, content, link))
            .map_err(|e| CollectorError::io(note, e))
    }

    /// Removes the first link form found, in one atomic edit.
    pub fn remove_any(&self, note: &Path, links: &[String]) -> Result<bool> {
        self.fs
            .process(note, &|content: &str| remove_first_link(content, links))
            .map_err(|e| CollectorError::io(note, e))
    }
}
