use anyhow::{Context, Result};
use collector_core::{
    CollectionConfig, CollectorConfig, EntryKind, EventRouter, FileEvent, LogNotifier,
    PhysicalFileSystem, SystemClock,
};
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a move out of the vault waits for its matching move in.
const RENAME_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, PartialEq, Eq)]
enum Message {
    File(FileEvent),
    ConfigChanged,
}

/// Watch `root` until Ctrl-C. Events are handled one at a time, in arrival order.
pub async fn run(root: PathBuf, config_path: PathBuf, config: CollectorConfig) -> Result<()> {
    // Watcher paths are compared against these, so both must be absolute.
    let root = root
        .canonicalize()
        .with_context(|| format!("resolving {}", root.display()))?;
    let config_path = resolve(&config_path);

    let fs = Arc::new(PhysicalFileSystem::new());
    let router = Arc::new(EventRouter::from_config(
        root.clone(),
        &config,
        fs,
        Box::new(SystemClock),
    ));
    let mut collection = config.collection;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => log::warn!("Watch error: {}", e),
        }
    })
    .context("creating file watcher")?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching {}", root.display()))?;

    log::info!("Watching {} for new and deleted files", root.display());

    let mut translator = Translator::new(config_path.clone());
    loop {
        let deadline = translator.deadline();
        let messages = tokio::select! {
            Some(event) = rx.recv() => translator.translate(event, Instant::now()),
            _ = sleep_until(deadline), if deadline.is_some() => translator.flush(),
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watcher");
                break;
            }
        };

        for message in messages {
            match message {
                Message::File(event) => route(&router, event, collection).await,
                Message::ConfigChanged => {
                    let path = config_path.clone();
                    match tokio::task::spawn_blocking(move || CollectorConfig::load(&path)).await {
                        Ok(Ok(reloaded)) => {
                            collection = reloaded.collection;
                            log::info!(
                                "Reloaded collection settings from {}",
                                config_path.display()
                            );
                        }
                        Ok(Err(e)) => log::error!("Keeping previous settings: {}", e),
                        Err(e) => log::error!("Config reload task failed: {}", e),
                    }
                }
            }
        }
    }
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}

/// Runs the router on the blocking pool and waits for it, keeping events ordered.
async fn route(router: &Arc<EventRouter>, event: FileEvent, collection: CollectionConfig) {
    let router = router.clone();
    let task = tokio::task::spawn_blocking(move || {
        let outcome = router.route(&event, &collection, &LogNotifier);
        log::debug!("{} -> {:?}", event.path.display(), outcome);
    });
    if let Err(e) = task.await {
        log::error!("Event handler task failed: {}", e);
    }
}

fn resolve(path: &Path) -> PathBuf {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    match (dir.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// A `RenameMode::From` still waiting for its `RenameMode::To`.
#[derive(Debug)]
struct PendingMove {
    tracker: Option<usize>,
    path: PathBuf,
    deadline: Instant,
}

/// Turns raw watcher events into router messages.
///
/// Moves are reported in halves. A `From` whose `To` never arrives left the
/// vault and counts as a delete; a `To` without a `From` came from outside
/// and counts as a create.
struct Translator {
    config_path: PathBuf,
    pending: Option<PendingMove>,
}

impl Translator {
    fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            pending: None,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Gives up on the pending move: it left the vault.
    fn flush(&mut self) -> Vec<Message> {
        match self.pending.take() {
            Some(pending) => vec![Message::File(FileEvent::delete(
                pending.path,
                EntryKind::Unknown,
            ))],
            None => Vec::new(),
        }
    }

    fn translate(&mut self, event: notify::Event, now: Instant) -> Vec<Message> {
        if let EventKind::Modify(ModifyKind::Name(RenameMode::To)) = event.kind {
            let paired = matches!(
                &self.pending,
                Some(pending) if pending.tracker == event.attrs.tracker()
            );
            if paired {
                self.pending = None;
                // Backends report the completed move again as `RenameMode::Both`.
                return Vec::new();
            }
        }

        let mut messages = self.flush();
        if event.paths.iter().any(|p| p == &self.config_path) {
            if let EventKind::Create(_) | EventKind::Modify(_) = event.kind {
                messages.push(Message::ConfigChanged);
            }
            return messages;
        }

        match event.kind {
            EventKind::Create(kind) => {
                let entry = match kind {
                    CreateKind::File => EntryKind::File,
                    CreateKind::Folder => EntryKind::Folder,
                    _ => EntryKind::Unknown,
                };
                messages.extend(
                    event
                        .paths
                        .into_iter()
                        .map(|path| Message::File(FileEvent::create(path, entry))),
                );
            }
            EventKind::Remove(kind) => {
                let entry = match kind {
                    RemoveKind::File => EntryKind::File,
                    RemoveKind::Folder => EntryKind::Folder,
                    _ => EntryKind::Unknown,
                };
                messages.extend(
                    event
                        .paths
                        .into_iter()
                        .map(|path| Message::File(FileEvent::delete(path, entry))),
                );
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                let tracker = event.attrs.tracker();
                if let Some(path) = event.paths.into_iter().next() {
                    self.pending = Some(PendingMove {
                        tracker,
                        path,
                        deadline: now + RENAME_WINDOW,
                    });
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                messages.extend(
                    event
                        .paths
                        .into_iter()
                        .map(|path| Message::File(FileEvent::create(path, EntryKind::Unknown))),
                );
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
                let mut paths = event.paths.into_iter();
                if let (Some(from), Some(to)) = (paths.next(), paths.next()) {
                    messages.push(Message::File(FileEvent::rename(
                        from,
                        to,
                        EntryKind::Unknown,
                    )));
                }
            }
            _ => {}
        }
        messages
    }
}
