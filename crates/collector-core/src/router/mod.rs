use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classify::should_collect;
use crate::clock::Clock;
use crate::config::{CollectionConfig, CollectorConfig};
use crate::error::Result;
use crate::link::{build_formatter, LinkFormatter};
use crate::locator::{build_locator, DailyNoteLocator};
use crate::model::{EntryKind, EventKind, FileEvent, FileRef};
use crate::mutate::{NoteMutator, Operation};
use crate::notice::{Notice, Notifier};
use crate::utils::normalize_relative_path;
use crate::vfs::FileSystem;


/// Why an event left the daily note alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NotAFile,
    NotCollected,
    SelfReference,
    NoDailyNote,
    Rename,
    OutsideRoot,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored(Reason),
    Inserted(PathBuf),
    Removed(PathBuf),
    /// The note already had (or already lacked) the link.
    Unchanged(PathBuf),
    /// The failure was handed to the notifier.
    Failed,
}

/// Drives the daily note from file-system events.
///
/// Strategies are fixed at construction; the collection flags are passed with
/// every event so hosts own the configuration.
pub struct EventRouter {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    formatter: Box<dyn LinkFormatter>,
    locator: Box<dyn DailyNoteLocator>,
    mutator: NoteMutator,
    clock: Box<dyn Clock>,
}

impl EventRouter {
    pub fn new(
        root: PathBuf,
        fs: Arc<dyn FileSystem>,
        formatter: Box<dyn LinkFormatter>,
        locator: Box<dyn DailyNoteLocator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            mutator: NoteMutator::new(fs.clone()),
            root,
            fs,
            formatter,
            locator,
            clock,
        }
    }

    pub fn from_config(
        root: PathBuf,
        config: &CollectorConfig,
        fs: Arc<dyn FileSystem>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let formatter = build_formatter(&config.link, root.clone(), fs.clone());
        let locator = build_locator(&config.daily_notes, &root, fs.clone());
        Self::new(root, fs, formatter, locator, clock)
    }

    /// Handle one event, reporting any failure through `notifier`.
    /// Never fails, so the event subscription keeps running.
    pub fn route(
        &self,
        event: &FileEvent,
        config: &CollectionConfig,
        notifier: &dyn Notifier,
    ) -> Outcome {
        match self.handle(event, config) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Failed to handle {:?} for {}: {}", event.kind, event.path.display(), e);
                notifier.notify(Notice::error(&e));
                Outcome::Failed
            }
        }
    }

    pub fn handle(&self, event: &FileEvent, config: &CollectionConfig) -> Result<Outcome> {
        let Some(file) = FileRef::from_path(&self.root, &event.path) else {
            return Ok(self.ignore(event, Reason::OutsideRoot));
        };
        if file.is_hidden() {
            return Ok(self.ignore(event, Reason::Hidden));
        }

        match &event.kind {
            EventKind::Create => self.on_create(event, &file, config),
            EventKind::Delete => self.on_delete(event, &file),
            // Hosts rewrite existing links on rename.
            EventKind::Rename { .. } => Ok(self.ignore(event, Reason::Rename)),
        }
    }

    fn on_create(
        &self,
        event: &FileEvent,
        file: &FileRef,
        config: &CollectionConfig,
    ) -> Result<Outcome> {
        let is_file = match event.entry {
            EntryKind::File => true,
            EntryKind::Folder => false,
            EntryKind::Unknown => self.fs.is_file(&event.path),
        };
        if !is_file {
            return Ok(self.ignore(event, Reason::NotAFile));
        }
        if !should_collect(file.extension(), config) {
            return Ok(self.ignore(event, Reason::NotCollected));
        }

        let note = self.locator.find_or_create(self.clock.today())?;
        let note_path = self.relative(&note);
        if note_path == file.path() {
            return Ok(self.ignore(event, Reason::SelfReference));
        }

        let link = self.formatter.link_for(file, &note_path);
        if self.mutator.mutate(&note, &link, Operation::Insert)? {
            log::info!("Linked {} in {}", file.path(), note_path);
            Ok(Outcome::Inserted(note))
        } else {
            Ok(Outcome::Unchanged(note))
        }
    }

    /// Removal is attempted whatever the current flags say: the flags may have
    /// changed since the link was inserted.
    fn on_delete(&self, event: &FileEvent, file: &FileRef) -> Result<Outcome> {
        if event.entry == EntryKind::Folder {
            return Ok(self.ignore(event, Reason::NotAFile));
        }
        let Some(note) = self.locator.find(self.clock.today())? else {
            return Ok(self.ignore(event, Reason::NoDailyNote));
        };
        let note_path = self.relative(&note);

        let links = self.formatter.link_forms(file, &note_path);
        if self.mutator.remove_any(&note, &links)? {
            log::info!("Unlinked {} from {}", file.path(), note_path);
            Ok(Outcome::Removed(note))
        } else {
            Ok(Outcome::Unchanged(note))
        }
    }

    fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => normalize_relative_path(relative),
            Err(_) => normalize_relative_path(path),
        }
    }

    fn ignore(&self, event: &FileEvent, reason: Reason) -> Outcome {
        log::debug!("Ignoring {:?} for {}: {:?}", event.kind, event.path.display(), reason);
        Outcome::Ignored(reason)
    }
}
