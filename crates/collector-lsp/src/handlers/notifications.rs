use crate::state::GlobalState;
use collector_core::{EntryKind, FileEvent, Notice};
use std::path::PathBuf;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Handle "workspace/didCreateFiles" notification
pub async fn handle_did_create_files(client: &Client, state: &GlobalState, params: CreateFilesParams) {
    let events = params
        .files
        .iter()
        .filter_map(|file| uri_to_path(&file.uri))
        .map(|path| FileEvent::create(path, EntryKind::Unknown))
        .collect();
    dispatch(client, state, events).await;
}

/// Handle "workspace/didDeleteFiles" notification
pub async fn handle_did_delete_files(client: &Client, state: &GlobalState, params: DeleteFilesParams) {
    let events = params
        .files
        .iter()
        .filter_map(|file| uri_to_path(&file.uri))
        .map(|path| FileEvent::delete(path, EntryKind::Unknown))
        .collect();
    dispatch(client, state, events).await;
}

/// Handle "workspace/didRenameFiles" notification
///
/// Forwarded so the router can log it; existing links are rewritten by the editor.
pub async fn handle_did_rename_files(client: &Client, state: &GlobalState, params: RenameFilesParams) {
    let events = params
        .files
        .iter()
        .filter_map(|rename| {
            let old_path = uri_to_path(&rename.old_uri)?;
            let new_path = uri_to_path(&rename.new_uri)?;
            Some(FileEvent::rename(old_path, new_path, EntryKind::Unknown))
        })
        .collect();
    dispatch(client, state, events).await;
}

/// Handle "workspace/didChangeWatchedFiles" notification
pub async fn handle_did_change_watched_files(
    client: &Client,
    state: &GlobalState,
    params: DidChangeWatchedFilesParams,
) {
    let events = params
        .changes
        .into_iter()
        .filter_map(|change| {
            let path = change.uri.to_file_path().ok()?;
            match change.typ {
                FileChangeType::CREATED => Some(FileEvent::create(path, EntryKind::Unknown)),
                FileChangeType::DELETED => Some(FileEvent::delete(path, EntryKind::Unknown)),
                _ => None,
            }
        })
        .collect();
    dispatch(client, state, events).await;
}

/// Run events through the router one by one. A failing event is shown to the
/// user and does not stop the ones after it.
async fn dispatch(client: &Client, state: &GlobalState, events: Vec<FileEvent>) {
    let session_lock = state.session.read().await;
    let Some(session) = &*session_lock else {
        log::warn!("Dropping {} file events received before initialize", events.len());
        return;
    };

    for event in &events {
        match session.router.handle(event, &session.config.collection) {
            Ok(outcome) => log::debug!("{} -> {:?}", event.path.display(), outcome),
            Err(e) => {
                log::warn!("Failed to handle {}: {}", event.path.display(), e);
                client
                    .show_message(MessageType::ERROR, Notice::error(&e).to_string())
                    .await;
            }
        }
    }
}

fn uri_to_path(uri: &str) -> Option<PathBuf> {
    uri.parse::<Url>().ok()?.to_file_path().ok()
}
