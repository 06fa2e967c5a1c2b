use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::CollectionConfig;

/// Extension tables. Extend a category only by editing these.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md"];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];
pub const DRAWING_EXTENSIONS: &[&str] = &["excalidraw"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Markdown,
    Image,
    Pdf,
    Audio,
    Video,
    Drawing,
    /// Anything not listed in the tables above.
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Markdown,
        Category::Image,
        Category::Pdf,
        Category::Audio,
        Category::Video,
        Category::Drawing,
        Category::Other,
    ];

    /// Category of an extension, case-insensitive. Total: unknown input is `Other`.
    pub fn of(extension: &str) -> Category {
        let ext = extension.to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.extensions().contains(&ext.as_str()))
            .unwrap_or(Category::Other)
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Category::Markdown => MARKDOWN_EXTENSIONS,
            Category::Image => IMAGE_EXTENSIONS,
            Category::Pdf => PDF_EXTENSIONS,
            Category::Audio => AUDIO_EXTENSIONS,
            Category::Video => VIDEO_EXTENSIONS,
            Category::Drawing => DRAWING_EXTENSIONS,
            Category::Other => &[],
        }
    }

    /// Name of the matching configuration flag.
    pub fn flag_name(self) -> &'static str {
        match self {
            Category::Markdown => "markdown",
            Category::Image => "images",
            Category::Pdf => "pdfs",
            Category::Audio => "audio",
            Category::Video => "videos",
            Category::Drawing => "drawing",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Category::Markdown),
            "images" | "image" => Ok(Category::Image),
            "pdfs" | "pdf" => Ok(Category::Pdf),
            "audio" => Ok(Category::Audio),
            "videos" | "video" => Ok(Category::Video),
            "drawing" | "excalidraw" => Ok(Category::Drawing),
            "other" => Ok(Category::Other),
            other => Err(format!("unknown file category '{}'", other)),
        }
    }
}

/// Whether a file with this extension is collected under `config`.
pub fn should_collect(extension: &str, config: &CollectionConfig) -> bool {
    config.is_enabled(Category::of(extension))
}
