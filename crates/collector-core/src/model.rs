use std::path::{Path, PathBuf};

use crate::utils::{is_hidden_path, normalize_relative_path};

/// A file as seen by one event.
///
/// `path` is root-relative and forward-slash separated, `extension` is the
/// lower-cased suffix after the final `.` of the file name (empty if none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: String,
    extension: String,
}

impl FileRef {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        let extension = match Self::split_name(&path) {
            (_, Some(ext)) => ext.to_lowercase(),
            (_, None) => String::new(),
        };
        Self { path, extension }
    }

    /// Build a reference for an absolute path below `root`.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let normalized = normalize_relative_path(relative);
        if normalized.is_empty() {
            return None;
        }
        Some(Self::new(normalized))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// File name including its extension.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without its final extension.
    pub fn basename(&self) -> &str {
        Self::split_name(&self.path).0
    }

    pub fn is_hidden(&self) -> bool {
        is_hidden_path(&self.path)
    }

    fn split_name(path: &str) -> (&str, Option<&str>) {
        let name = path.rsplit('/').next().unwrap_or(path);
        match name.rfind('.') {
            Some(idx) => (&name[..idx], Some(&name[idx + 1..])),
            None => (name, None),
        }
    }
}

/// What kind of entry an event refers to, as far as the host knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
    /// The host could not tell; checked against the file system when it matters.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Delete,
    Rename { from: PathBuf },
}

/// A single file-system notification delivered by a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub kind: EventKind,
    /// Absolute path of the entry (the new path for renames).
    pub path: PathBuf,
    pub entry: EntryKind,
}

impl FileEvent {
    pub fn create(path: impl Into<PathBuf>, entry: EntryKind) -> Self {
        Self {
            kind: EventKind::Create,
            path: path.into(),
            entry,
        }
    }

    pub fn delete(path: impl Into<PathBuf>, entry: EntryKind) -> Self {
        Self {
            kind: EventKind::Delete,
            path: path.into(),
            entry,
        }
    }

    pub fn rename(from: impl Into<PathBuf>, to: impl Into<PathBuf>, entry: EntryKind) -> Self {
        Self {
            kind: EventKind::Rename { from: from.into() },
            path: to.into(),
            entry,
        }
    }
}
