use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

/// Abstract interface for file system operations.
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Whether a regular file exists at `path`.
    fn is_file(&self, path: &Path) -> bool;

    /// Create a new file with initial content, creating parent folders.
    /// Fails with `AlreadyExists` if the file is already there.
    fn create_file(&self, path: &Path, content: &str) -> io::Result<()>;

    /// List every regular file under the root directory, recursively.
    fn walk_files(&self, root: &Path) -> Vec<PathBuf>;

    /// List all files with the given extension under the root directory.
    fn list_files(&self, root: &Path, extension: &str) -> Vec<PathBuf> {
        self.walk_files(root)
            .into_iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
            .collect()
    }

    /// Apply `transform` to the current content and write the result back
    /// if it differs. Transforms on the same file system never interleave.
    /// Returns whether the content changed.
    fn process(&self, path: &Path, transform: &dyn Fn(&str) -> String) -> io::Result<bool>;
}

/// Standard implementation of FileSystem using std::fs and walkdir.
#[derive(Default)]
pub struct PhysicalFileSystem {
    process_lock: Mutex<()>,
}

impl PhysicalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileSystem for PhysicalFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_file(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        file.write_all(content.as_bytes())
    }

    fn walk_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    }

    fn process(&self, path: &Path, transform: &dyn Fn(&str) -> String) -> io::Result<bool> {
        let _guard = self
            .process_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let current = fs::read_to_string(path)?;
        let next = transform(&current);
        if next == current {
            return Ok(false);
        }
        fs::write(path, next)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_create_file_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        let path = dir.path().join("journal/2024-05-01.md");

        fs.create_file(&path, "first").unwrap();
        let err = fs.create_file(&path, "second").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs.read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_process_reports_change() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "a").unwrap();

        assert!(!fs.process(&path, &|c: &str| c.to_string()).unwrap());
        assert!(fs.process(&path, &|c: &str| format!("{}b", c)).unwrap());
        assert_eq!(fs.read_to_string(&path).unwrap(), "ab");
    }

    #[test]
    fn test_process_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        assert!(fs.process(&dir.path().join("nope.md"), &|c: &str| c.to_string()).is_err());
    }

    #[test]
    fn test_concurrent_process_loses_no_update() {
        let dir = TempDir::new().unwrap();
        let fs = Arc::new(PhysicalFileSystem::new());
        let path = dir.path().join("note.md");
        std::fs::write(&path, "").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let fs = fs.clone();
                let path = path.clone();
                thread::spawn(move || {
                    fs.process(&path, &|c: &str| format!("{}{}\n", c, i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs.read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 8);
    }

    #[test]
    fn test_list_files_by_extension() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        fs.create_file(&dir.path().join("a.md"), "").unwrap();
        fs.create_file(&dir.path().join("sub/b.md"), "").unwrap();
        fs.create_file(&dir.path().join("sub/c.png"), "").unwrap();

        let mut md = fs.list_files(dir.path(), "md");
        md.sort();
        assert_eq!(md, vec![dir.path().join("a.md"), dir.path().join("sub/b.md")]);
        assert_eq!(fs.walk_files(dir.path()).len(), 3);
    }
}
