use collector_core::config::LogLevel;
use collector_core::{Category, CollectionConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;

/// Settings section the client sends under `dailyCollector`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LspSettings {
    /// Master toggle, applied on top of `collection` when it differs from
    /// what the flags already imply
    pub only_markdown: Option<bool>,

    /// Individual category flags
    pub collection: Option<CollectionOverrides>,
}

/// Category flags sent by the client. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionOverrides {
    pub markdown: Option<bool>,
    pub images: Option<bool>,
    pub pdfs: Option<bool>,
    pub audio: Option<bool>,
    pub videos: Option<bool>,
    pub drawing: Option<bool>,
    pub other: Option<bool>,
}

impl CollectionOverrides {
    pub fn apply_to(&self, flags: &mut CollectionConfig) {
        let overrides = [
            (Category::Markdown, self.markdown),
            (Category::Image, self.images),
            (Category::Pdf, self.pdfs),
            (Category::Audio, self.audio),
            (Category::Video, self.videos),
            (Category::Drawing, self.drawing),
            (Category::Other, self.other),
        ];
        for (category, value) in overrides {
            if let Some(enabled) = value {
                flags.set(category, enabled);
            }
        }
    }
}

pub const SETTINGS_SECTION: &str = "dailyCollector";

/// Environment variable that overrides the configured log level.
pub const LOG_ENV: &str = "RUST_LOG";

/// Level to log at once the vault config is known. `None` when `RUST_LOG`
/// already decided.
pub fn effective_log_level(configured: LogLevel, env_filter: Option<&OsStr>) -> Option<LevelFilter> {
    match env_filter {
        Some(_) => None,
        None => Some(configured.as_filter()),
    }
}

/// Switch to the vault's configured level, unless `RUST_LOG` is set.
pub fn apply_log_level(configured: LogLevel) {
    let env_filter = std::env::var_os(LOG_ENV);
    if let Some(level) = effective_log_level(configured, env_filter.as_deref()) {
        log::set_max_level(level);
    }
}
