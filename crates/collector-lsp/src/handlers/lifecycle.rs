use crate::config::apply_log_level;
use crate::state::{GlobalState, Session};
use collector_core::{CollectorConfig, EventRouter, CONFIG_FILE_NAME};
use std::path::PathBuf;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Handle "initialize" request
pub async fn handle_initialize(
    client: &Client,
    state: &GlobalState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    match root_path(&params) {
        Some(root) => {
            client
                .log_message(
                    MessageType::INFO,
                    format!("Collecting into daily notes of: {:?}", root),
                )
                .await;

            let config_path = root.join(CONFIG_FILE_NAME);
            let config = match CollectorConfig::load(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    client
                        .show_message(
                            MessageType::ERROR,
                            collector_core::Notice::error(&e).to_string(),
                        )
                        .await;
                    CollectorConfig::default()
                }
            };

            apply_log_level(config.logging.level);

            let router = EventRouter::from_config(
                root,
                &config,
                state.fs.clone(),
                Box::new(state.clock.clone()),
            );
            log::info!(
                "Link strategy {:?}, daily notes strategy {:?}",
                config.link.strategy,
                config.daily_notes.strategy
            );

            let mut session = state.session.write().await;
            *session = Some(Session {
                router,
                config,
                config_path,
            });
        }
        None => {
            client
                .log_message(MessageType::WARNING, "No rootUri provided!")
                .await;
        }
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: None,
                file_operations: Some(WorkspaceFileOperationsServerCapabilities {
                    did_create: Some(file_registration(FileOperationPatternKind::File)),
                    did_delete: Some(file_registration(FileOperationPatternKind::File)),
                    did_rename: Some(file_registration(FileOperationPatternKind::File)),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        },
        ..Default::default()
    })
}

fn root_path(params: &InitializeParams) -> Option<PathBuf> {
    if let Some(uri) = &params.root_uri {
        return uri.to_file_path().ok();
    }
    params
        .workspace_folders
        .as_ref()?
        .first()?
        .uri
        .to_file_path()
        .ok()
}

fn file_registration(kind: FileOperationPatternKind) -> FileOperationRegistrationOptions {
    FileOperationRegistrationOptions {
        filters: vec![FileOperationFilter {
            scheme: Some("file".to_string()),
            pattern: FileOperationPattern {
                glob: "**/*".to_string(),
                matches: Some(kind),
                options: None,
            },
        }],
    }
}
