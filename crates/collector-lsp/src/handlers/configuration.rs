use crate::config::{LspSettings, SETTINGS_SECTION};
use crate::state::GlobalState;
use collector_core::Notice;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Handle "workspace/didChangeConfiguration" notification
///
/// Only the collection flags can change at runtime; link and daily note
/// strategies stay as they were at initialize. Every accepted change is saved.
pub async fn handle_did_change_configuration(
    client: &Client,
    state: &GlobalState,
    params: DidChangeConfigurationParams,
) {
    let serde_json::Value::Object(map) = params.settings else {
        return;
    };
    let Some(section) = map.get(SETTINGS_SECTION) else {
        return;
    };

    let settings = match serde_json::from_value::<LspSettings>(section.clone()) {
        Ok(settings) => settings,
        Err(e) => {
            client
                .log_message(
                    MessageType::ERROR,
                    format!("Failed to parse updated settings: {}", e),
                )
                .await;
            return;
        }
    };

    let mut session_lock = state.session.write().await;
    let Some(session) = session_lock.as_mut() else {
        return;
    };

    let mut flags = session.config.collection;
    if let Some(collection) = settings.collection {
        collection.apply_to(&mut flags);
    }
    if let Some(only_markdown) = settings.only_markdown {
        if only_markdown != flags.only_markdown() {
            flags.set_only_markdown(only_markdown);
        }
    }
    if flags == session.config.collection {
        return;
    }

    session.config.collection = flags;
    if let Err(e) = session.config.save(&session.config_path) {
        client
            .show_message(MessageType::ERROR, Notice::error(&e).to_string())
            .await;
        return;
    }
    client
        .log_message(MessageType::INFO, "Collection settings updated")
        .await;
}
