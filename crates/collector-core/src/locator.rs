use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::clock::{date_key, parse_date_key};
use crate::config::{DailyNotesConfig, LocatorStrategy};
use crate::error::{CollectorError, Result};
use crate::vfs::FileSystem;

/// Resolves the daily note of a date.
pub trait DailyNoteLocator: Send + Sync {
    /// Where the note of `date` is created when none exists yet.
    fn note_path(&self, date: NaiveDate) -> PathBuf;

    /// Existing note of `date`, if any.
    fn find(&self, date: NaiveDate) -> Result<Option<PathBuf>>;

    /// Existing note of `date`, or a freshly created one.
    /// Repeated calls for one date always resolve to the same note.
    fn find_or_create(&self, date: NaiveDate) -> Result<PathBuf>;
}

/// `<root>/<YYYY-MM-DD>.md`, created empty.
pub struct DirectLocator {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    create_lock: Mutex<()>,
}

impl DirectLocator {
    pub fn new(root: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root,
            fs,
            create_lock: Mutex::new(()),
        }
    }
}

impl DailyNoteLocator for DirectLocator {
    fn note_path(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!("{}.md", date_key(date)))
    }

    fn find(&self, date: NaiveDate) -> Result<Option<PathBuf>> {
        let path = self.note_path(date);
        Ok(self.fs.is_file(&path).then_some(path))
    }

    fn find_or_create(&self, date: NaiveDate) -> Result<PathBuf> {
        let _guard = self
            .create_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(path) = self.find(date)? {
            return Ok(path);
        }
        let path = self.note_path(date);
        create_if_absent(&*self.fs, &path, "")?;
        Ok(path)
    }
}

/// Looks the note up among all daily notes below a folder, creating new ones
/// there from an optional template.
pub struct RegistryLocator {
    folder: PathBuf,
    template: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
    create_lock: Mutex<()>,
}

impl RegistryLocator {
    pub fn new(folder: PathBuf, template: Option<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            folder,
            template,
            fs,
            create_lock: Mutex::new(()),
        }
    }

    /// Every note below the folder whose name is a date key.
    /// When a date has several notes, the first path in sort order wins.
    pub fn all_daily_notes(&self) -> BTreeMap<NaiveDate, PathBuf> {
        let mut paths = self.fs.list_files(&self.folder, "md");
        paths.sort();

        let mut notes = BTreeMap::new();
        for path in paths {
            let date = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(parse_date_key);
            if let Some(date) = date {
                notes.entry(date).or_insert(path);
            }
        }
        notes
    }

    fn initial_content(&self) -> String {
        let Some(template) = &self.template else {
            return String::new();
        };
        match self.fs.read_to_string(template) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Daily note template {} unreadable, starting empty: {}",
                    template.display(),
                    e
                );
                String::new()
            }
        }
    }
}

impl DailyNoteLocator for RegistryLocator {
    fn note_path(&self, date: NaiveDate) -> PathBuf {
        self.folder.join(format!("{}.md", date_key(date)))
    }

    fn find(&self, date: NaiveDate) -> Result<Option<PathBuf>> {
        Ok(self.all_daily_notes().remove(&date))
    }

    fn find_or_create(&self, date: NaiveDate) -> Result<PathBuf> {
        let _guard = self
            .create_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(path) = self.find(date)? {
            return Ok(path);
        }
        let path = self.note_path(date);
        create_if_absent(&*self.fs, &path, &self.initial_content())?;
        Ok(path)
    }
}

/// A note appearing between the lookup and the create counts as found.
fn create_if_absent(fs: &dyn FileSystem, path: &Path, content: &str) -> Result<()> {
    match fs.create_file(path, content) {
        Ok(()) => {
            log::info!("Created daily note {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(CollectorError::io(path, e)),
    }
}

/// Select the locator for a vault once, at startup.
pub fn build_locator(
    config: &DailyNotesConfig,
    root: &Path,
    fs: Arc<dyn FileSystem>,
) -> Box<dyn DailyNoteLocator> {
    match config.strategy {
        LocatorStrategy::Direct => Box::new(DirectLocator::new(root.to_path_buf(), fs)),
        LocatorStrategy::Registry => {
            let folder = match &config.folder {
                Some(folder) => root.join(folder),
                None => root.to_path_buf(),
            };
            let template = config.template.as_ref().map(|t| root.join(t));
            Box::new(RegistryLocator::new(folder, template, fs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::PhysicalFileSystem;
    use std::thread;
    use tempfile::TempDir;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn fs() -> Arc<dyn FileSystem> {
        Arc::new(PhysicalFileSystem::new())
    }

    #[test]
    fn test_direct_locator_creates_empty_note_once() {
        let dir = TempDir::new().unwrap();
        let locator = DirectLocator::new(dir.path().to_path_buf(), fs());

        assert_eq!(locator.find(may_first()).unwrap(), None);
        let path = locator.find_or_create(may_first()).unwrap();
        assert_eq!(path, dir.path().join("2024-05-01.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        std::fs::write(&path, "- [[kept]]").unwrap();
        assert_eq!(locator.find_or_create(may_first()).unwrap(), path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "- [[kept]]");
    }

    #[test]
    fn test_direct_locator_concurrent_callers_share_one_note() {
        let dir = TempDir::new().unwrap();
        let locator = Arc::new(DirectLocator::new(dir.path().to_path_buf(), fs()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locator = locator.clone();
                thread::spawn(move || locator.find_or_create(may_first()).unwrap())
            })
            .collect();
        let paths: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(paths.iter().all(|p| p == &paths[0]));
        assert_eq!(PhysicalFileSystem::new().walk_files(dir.path()).len(), 1);
    }

    #[test]
    fn test_registry_finds_existing_note_in_subfolder() {
        let dir = TempDir::new().unwrap();
        let fs = fs();
        let existing = dir.path().join("journal/2024/2024-05-01.md");
        fs.create_file(&existing, "hello").unwrap();
        fs.create_file(&dir.path().join("journal/not-a-date.md"), "").unwrap();

        let locator = RegistryLocator::new(dir.path().join("journal"), None, fs);
        assert_eq!(locator.all_daily_notes().len(), 1);
        assert_eq!(locator.find_or_create(may_first()).unwrap(), existing);
    }

    #[test]
    fn test_registry_creates_from_template() {
        let dir = TempDir::new().unwrap();
        let fs = fs();
        let template = dir.path().join("templates/daily.md");
        fs.create_file(&template, "# Today\n").unwrap();

        let locator = RegistryLocator::new(dir.path().join("journal"), Some(template), fs);
        let path = locator.find_or_create(may_first()).unwrap();
        assert_eq!(path, dir.path().join("journal/2024-05-01.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Today\n");
    }

    #[test]
    fn test_registry_missing_template_starts_empty() {
        let dir = TempDir::new().unwrap();
        let locator = RegistryLocator::new(
            dir.path().to_path_buf(),
            Some(dir.path().join("missing.md")),
            fs(),
        );
        let path = locator.find_or_create(may_first()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_build_locator_resolves_folder_against_root() {
        let dir = TempDir::new().unwrap();
        let config = DailyNotesConfig {
            strategy: LocatorStrategy::Registry,
            folder: Some(PathBuf::from("daily")),
            template: None,
        };
        let locator = build_locator(&config, dir.path(), fs());
        assert_eq!(
            locator.note_path(may_first()),
            dir.path().join("daily/2024-05-01.md")
        );

        let direct = build_locator(&DailyNotesConfig::default(), dir.path(), fs());
        assert_eq!(direct.note_path(may_first()), dir.path().join("2024-05-01.md"));
    }
}
