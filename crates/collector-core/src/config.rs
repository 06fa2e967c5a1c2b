use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::Category;
use crate::error::{CollectorError, Result};

/// Default file name of the configuration, relative to the vault root
pub const CONFIG_FILE_NAME: &str = ".daily-collector.yaml";

/// Top-level configuration for the Daily Note Collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub collection: CollectionConfig,
    pub link: LinkConfig,
    pub daily_notes: DailyNotesConfig,
    pub logging: LoggingConfig,
}

/// Which file categories get a link in the daily note.
///
/// Missing fields fall back to their defaults, so a stored file only needs
/// the overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub markdown: bool,
    pub images: bool,
    pub pdfs: bool,
    pub audio: bool,
    pub videos: bool,
    pub drawing: bool,
    pub other: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            markdown: true,
            images: true,
            pdfs: true,
            audio: true,
            videos: true,
            drawing: true,
            other: false,
        }
    }
}

impl CollectionConfig {
    pub fn only_markdown_flags() -> Self {
        let mut flags = Self::all_flags();
        flags.set_only_markdown(true);
        flags
    }

    pub fn all_flags() -> Self {
        let mut flags = Self::default();
        flags.set_only_markdown(false);
        flags
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Markdown => self.markdown,
            Category::Image => self.images,
            Category::Pdf => self.pdfs,
            Category::Audio => self.audio,
            Category::Video => self.videos,
            Category::Drawing => self.drawing,
            Category::Other => self.other,
        }
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        let flag = match category {
            Category::Markdown => &mut self.markdown,
            Category::Image => &mut self.images,
            Category::Pdf => &mut self.pdfs,
            Category::Audio => &mut self.audio,
            Category::Video => &mut self.videos,
            Category::Drawing => &mut self.drawing,
            Category::Other => &mut self.other,
        };
        *flag = enabled;
    }

    /// True iff markdown is the only enabled category.
    pub fn only_markdown(&self) -> bool {
        Category::ALL
            .into_iter()
            .all(|c| self.is_enabled(c) == (c == Category::Markdown))
    }

    /// On: markdown only. Off: every category, `other` included.
    pub fn set_only_markdown(&mut self, enabled: bool) {
        for category in Category::ALL {
            self.set(category, !enabled || category == Category::Markdown);
        }
    }
}

/// How link text is produced. Chosen once when the router is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub strategy: LinkStrategy,
    /// Only used by the host strategy
    pub style: LinkStyle,
    /// Only used by the host strategy
    pub path: LinkPathMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStrategy {
    /// Ask the vault link host for the canonical link
    Host,
    /// `[[name]]` for notes, `![[path]]` for everything else
    #[default]
    Fallback,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    #[default]
    Wiki,
    Markdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPathMode {
    /// Bare file name when it is unique in the vault
    #[default]
    Shortest,
    /// Full root-relative path
    Absolute,
}

/// Where daily notes live
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyNotesConfig {
    pub strategy: LocatorStrategy,
    /// Folder of the daily notes (relative to the vault root)
    pub folder: Option<PathBuf>,
    /// File whose content seeds a new daily note (relative to the vault root)
    pub template: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    /// Scan the daily notes folder for a note named after the date
    Registry,
    /// `<root>/<YYYY-MM-DD>.md`
    #[default]
    Direct,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl CollectorConfig {
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Read the stored configuration. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_yaml(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CollectorError::io(path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|e| CollectorError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let flags = CollectionConfig::default();
        assert!(flags.markdown && flags.images && flags.pdfs);
        assert!(flags.audio && flags.videos && flags.drawing);
        assert!(!flags.other);
        assert!(!flags.only_markdown());
    }

    #[test]
    fn test_only_markdown_toggle() {
        let mut flags = CollectionConfig::default();
        flags.set_only_markdown(true);
        assert!(flags.only_markdown());
        for category in Category::ALL {
            assert_eq!(flags.is_enabled(category), category == Category::Markdown);
        }

        flags.set_only_markdown(false);
        assert!(!flags.only_markdown());
        for category in Category::ALL {
            assert!(flags.is_enabled(category), "{} should be on", category);
        }
    }

    #[test]
    fn test_only_markdown_is_derived() {
        let mut flags = CollectionConfig::all_flags();
        for category in Category::ALL {
            if category != Category::Markdown {
                flags.set(category, false);
            }
        }
        assert!(flags.only_markdown());

        flags.set(Category::Markdown, false);
        assert!(!flags.only_markdown());
    }

    #[test]
    fn test_stored_overrides_merge_over_defaults() {
        let config = CollectorConfig::from_yaml("collection:\n  images: false\n").unwrap();
        assert!(!config.collection.images);
        assert!(config.collection.markdown);
        assert!(!config.collection.other);
        assert_eq!(config.link, LinkConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(CollectorConfig::from_yaml("").unwrap(), CollectorConfig::default());
    }

    #[test]
    fn test_enum_spelling() {
        let yaml = "link:\n  strategy: host\n  style: markdown\n  path: absolute\ndaily_notes:\n  strategy: registry\n  folder: journal\nlogging:\n  level: warning\n";
        let config = CollectorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.link.strategy, LinkStrategy::Host);
        assert_eq!(config.link.style, LinkStyle::Markdown);
        assert_eq!(config.link.path, LinkPathMode::Absolute);
        assert_eq!(config.daily_notes.strategy, LocatorStrategy::Registry);
        assert_eq!(config.daily_notes.folder, Some(PathBuf::from("journal")));
        assert_eq!(config.logging.level.as_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(CollectorConfig::from_yaml("collection: [1, 2").is_err());
    }

    #[test]
    fn test_load_missing_file_and_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = CollectorConfig::load(&path).unwrap();
        assert_eq!(config, CollectorConfig::default());

        config.collection.set_only_markdown(true);
        config.save(&path).unwrap();
        assert_eq!(CollectorConfig::load(&path).unwrap(), config);
    }
}
