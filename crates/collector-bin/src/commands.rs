use anyhow::{Context, Result};
use collector_core::locator::build_locator;
use collector_core::settings::{apply_toggle, SettingsView, Toggle};
use collector_core::{Category, Clock, CollectorConfig, PhysicalFileSystem, SystemClock};
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

pub fn today(root: &Path, config: &CollectorConfig, create: bool) -> Result<()> {
    let locator = build_locator(&config.daily_notes, root, Arc::new(PhysicalFileSystem::new()));
    let date = SystemClock.today();
    let path = if create {
        locator.find_or_create(date)?
    } else {
        locator.find(date)?.unwrap_or_else(|| locator.note_path(date))
    };
    println!("{}", path.display());
    Ok(())
}

pub fn show(config: &CollectorConfig) {
    print!("{}", render(&SettingsView::from_config(&config.collection, None)));
}

pub fn set(config_path: &Path, toggle: Toggle, value: bool) -> Result<()> {
    let mut config = CollectorConfig::load(config_path)?;
    apply_toggle(&mut config.collection, toggle, value)?;
    config
        .save(config_path)
        .with_context(|| format!("saving {}", config_path.display()))?;
    log::info!("Saved collection settings to {}", config_path.display());
    show(&config);
    Ok(())
}

pub fn set_category(config_path: &Path, category: Category, value: bool) -> Result<()> {
    set(config_path, Toggle::Category(category), value)
}

fn render(view: &SettingsView) -> String {
    let mut out = String::new();
    let mark = |on: bool| if on { "on" } else { "off" };

    let _ = writeln!(out, "Only Markdown: {}", mark(view.only_markdown));
    if !view.file_types_open {
        let _ = writeln!(out, "(individual file types hidden while only markdown is collected)");
        return out;
    }
    for toggle in &view.toggles {
        let _ = writeln!(
            out,
            "  {:<10} {:<3} {}{}",
            toggle.category.flag_name(),
            mark(toggle.value),
            toggle.name,
            if toggle.disabled { " (disabled)" } else { "" }
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use collector_core::CollectionConfig;
    use tempfile::TempDir;

    #[test]
    fn test_render_defaults() {
        let out = render(&SettingsView::from_config(&CollectionConfig::default(), None));
        assert!(out.starts_with("Only Markdown: off\n"));
        assert!(out.contains("images     on  Images (.png, .jpg, etc)"));
        assert!(out.contains("other      off Other Files"));
    }

    #[test]
    fn test_render_master_mode_collapses() {
        let out = render(&SettingsView::from_config(&CollectionConfig::only_markdown_flags(), None));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_set_persists_toggle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".daily-collector.yaml");

        set(&path, Toggle::OnlyMarkdown, true).unwrap();
        assert!(CollectorConfig::load(&path).unwrap().collection.only_markdown());

        assert!(set_category(&path, Category::Pdf, true).is_err());

        set(&path, Toggle::OnlyMarkdown, false).unwrap();
        set_category(&path, Category::Other, false).unwrap();
        let flags = CollectorConfig::load(&path).unwrap().collection;
        assert!(flags.pdfs && !flags.other);
    }
}
