//! Settings surface as plain data: what a UI shows, and how a toggle changes
//! the flags. Only the flags are persisted.

use crate::classify::Category;
use crate::config::CollectionConfig;
use crate::error::{CollectorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryToggle {
    pub category: Category,
    pub name: &'static str,
    pub description: &'static str,
    pub value: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    /// The "Only Markdown" master toggle
    pub only_markdown: bool,
    /// Whether the per-type section is expanded
    pub file_types_open: bool,
    pub toggles: Vec<CategoryToggle>,
}

impl SettingsView {
    /// `open` is the display state chosen by the user, if any. Without one the
    /// per-type section starts expanded unless master mode is on.
    pub fn from_config(config: &CollectionConfig, open: Option<bool>) -> Self {
        let only_markdown = config.only_markdown();
        let toggles = Category::ALL
            .into_iter()
            .map(|category| {
                let (name, description) = labels(category);
                CategoryToggle {
                    category,
                    name,
                    description,
                    value: config.is_enabled(category),
                    disabled: only_markdown,
                }
            })
            .collect();

        Self {
            only_markdown,
            file_types_open: open.unwrap_or(!only_markdown),
            toggles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    OnlyMarkdown,
    Category(Category),
}

/// Apply a toggle change. Category toggles are rejected while master mode is on.
pub fn apply_toggle(config: &mut CollectionConfig, toggle: Toggle, value: bool) -> Result<()> {
    match toggle {
        Toggle::OnlyMarkdown => config.set_only_markdown(value),
        Toggle::Category(category) => {
            if config.only_markdown() {
                return Err(CollectorError::ToggleDisabled(category));
            }
            config.set(category, value);
        }
    }
    Ok(())
}

fn labels(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Markdown => ("Markdown (.md)", "Collect markdown files"),
        Category::Image => ("Images (.png, .jpg, etc)", "Collect image files"),
        Category::Pdf => ("PDFs (.pdf)", "Collect PDF files"),
        Category::Audio => ("Audio (.mp3, .wav, etc)", "Collect audio files"),
        Category::Video => ("Videos (.mp4, etc)", "Collect video files"),
        Category::Drawing => ("Excalidraw (.excalidraw)", "Collect Excalidraw files"),
        Category::Other => (
            "Other Files",
            "Collect any other file types not listed above",
        ),
    }
}
