//! Daily Note Collector LSP Library
//!
//! Lets an editor act as the host: its file operation notifications drive the
//! core router, and failures come back as `window/showMessage` errors.

use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LspService};

pub use crate::state::GlobalState;

mod config;
mod handlers;
mod state;


/// Install the logger. Until a vault config is loaded the default level
/// applies; `RUST_LOG` overrides both.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .parse_env(config::LOG_ENV)
        .init();
    config::apply_log_level(collector_core::config::LogLevel::default());
}

/// LSP backend implementation
pub struct Backend {
    client: Client,
    state: GlobalState,
}

impl Backend {
    pub fn new(client: Client, state: GlobalState) -> Self {
        Self { client, state }
    }
}

#[tower_lsp::async_trait]
impl tower_lsp::LanguageServer for Backend {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        handlers::handle_initialize(&self.client, &self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("Client initialized, collecting file events");
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        log::info!("Shutdown requested");
        Ok(())
    }

    async fn did_create_files(&self, params: CreateFilesParams) {
        handlers::handle_did_create_files(&self.client, &self.state, params).await
    }

    async fn did_delete_files(&self, params: DeleteFilesParams) {
        handlers::handle_did_delete_files(&self.client, &self.state, params).await
    }

    async fn did_rename_files(&self, params: RenameFilesParams) {
        handlers::handle_did_rename_files(&self.client, &self.state, params).await
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handlers::handle_did_change_watched_files(&self.client, &self.state, params).await
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::handle_did_change_configuration(&self.client, &self.state, params).await
    }
}

/// Create and return LSP service and client socket
pub fn create_lsp_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(|client| Backend::new(client, GlobalState::default()))
}
