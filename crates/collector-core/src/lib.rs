//! Daily Note Collector Core Library
//!
//! Keeps today's daily note in sync with the files created and deleted in a vault.
//! No watcher or protocol dependencies: hosts feed `FileEvent`s into the `EventRouter`.
//!

pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod link;
pub mod locator;
pub mod model;
pub mod mutate;
pub mod notice;
pub mod router;
pub mod settings;
pub mod utils;
pub mod vfs;

pub use classify::{should_collect, Category};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CollectionConfig, CollectorConfig, CONFIG_FILE_NAME};
pub use error::{CollectorError, Result};
pub use model::{EntryKind, EventKind, FileEvent, FileRef};
pub use notice::{LogNotifier, Notice, Notifier};
pub use router::{EventRouter, Outcome, Reason};
pub use utils::normalize_relative_path;
pub use vfs::{FileSystem, PhysicalFileSystem};
