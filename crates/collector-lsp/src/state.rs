use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use collector_core::{Clock, CollectorConfig, EventRouter, FileSystem, PhysicalFileSystem, SystemClock};

/// Everything built for one workspace root during `initialize`.
pub struct Session {
    pub router: EventRouter,
    pub config: CollectorConfig,
    pub config_path: PathBuf,
}

/// Global state for LSP server
/// Must be Send + Sync
#[derive(Clone)]
pub struct GlobalState {
    /// Events are handled under the read lock, configuration changes take the write lock
    pub session: Arc<RwLock<Option<Session>>>,
    pub fs: Arc<dyn FileSystem>,
    pub clock: Arc<dyn Clock>,
}

impl GlobalState {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            fs,
            clock,
        }
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new(Arc::new(PhysicalFileSystem::new()), Arc::new(SystemClock))
    }
}
