//! Link text for collected files.
//!
//! Whatever strategy is picked must stay the same for the lifetime of a note:
//! removal only works if it produces byte-identical text to insertion. Where
//! the text depends on the rest of the vault, removal also tries every form
//! the file could have been linked with.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::PathBuf;
use std::sync::Arc;

use crate::classify::Category;
use crate::config::{LinkConfig, LinkPathMode, LinkStrategy, LinkStyle};
use crate::model::FileRef;
use crate::vfs::FileSystem;

/// Characters escaped in markdown-style link destinations.
const LINK_DESTINATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'<')
    .add(b'>')
    .add(b'(')
    .add(b')')
    .add(b'#')
    .add(b'%')
    .add(b'^')
    .add(b'[')
    .add(b']');

pub trait LinkFormatter: Send + Sync {
    /// Link for `file` as written into the note at `source_path`.
    fn link_for(&self, file: &FileRef, source_path: &str) -> String;

    /// Every text `file` may have been inserted as, most likely first.
    fn link_forms(&self, file: &FileRef, source_path: &str) -> Vec<String> {
        vec![self.link_for(file, source_path)]
    }
}

/// Self-contained formatter: `[[name]]` for notes, `![[path]]` embeds for
/// everything else, images shrunk to thumbnails.
pub struct EmbedLinkFormatter;

impl LinkFormatter for EmbedLinkFormatter {
    fn link_for(&self, file: &FileRef, _source_path: &str) -> String {
        match Category::of(file.extension()) {
            Category::Markdown => format!("[[{}]]", file.basename()),
            Category::Image => format!("![[{}|50]]", file.path()),
            _ => format!("![[{}]]", file.path()),
        }
    }
}

/// Link generation facility of the environment hosting the vault.
pub trait LinkHost: Send + Sync {
    fn generate_markdown_link(&self, file: &FileRef, source_path: &str, display: &str) -> String;

    /// Links the host could have generated for `file` at an earlier point,
    /// the current one first.
    fn markdown_link_forms(&self, file: &FileRef, source_path: &str, display: &str) -> Vec<String> {
        vec![self.generate_markdown_link(file, source_path, display)]
    }
}

/// Delegates to the host so links match the user's configured style.
pub struct HostLinkFormatter<H> {
    host: H,
}

impl<H: LinkHost> HostLinkFormatter<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<H: LinkHost> LinkFormatter for HostLinkFormatter<H> {
    fn link_for(&self, file: &FileRef, source_path: &str) -> String {
        self.host.generate_markdown_link(file, source_path, "")
    }

    fn link_forms(&self, file: &FileRef, source_path: &str) -> Vec<String> {
        self.host.markdown_link_forms(file, source_path, "")
    }
}

/// Bundled link host working off the vault on disk.
pub struct VaultLinkHost {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    style: LinkStyle,
    path_mode: LinkPathMode,
}

impl VaultLinkHost {
    pub fn new(
        root: PathBuf,
        fs: Arc<dyn FileSystem>,
        style: LinkStyle,
        path_mode: LinkPathMode,
    ) -> Self {
        Self {
            root,
            fs,
            style,
            path_mode,
        }
    }

    /// Path used to refer to `file`, extension included.
    fn link_path(&self, file: &FileRef) -> String {
        match self.path_mode {
            LinkPathMode::Absolute => file.path().to_string(),
            LinkPathMode::Shortest => {
                let clashes = self
                    .fs
                    .walk_files(&self.root)
                    .iter()
                    .filter_map(|p| FileRef::from_path(&self.root, p))
                    .any(|other| other.name() == file.name() && other.path() != file.path());
                if clashes {
                    file.path().to_string()
                } else {
                    file.name().to_string()
                }
            }
        }
    }

    fn format(&self, file: &FileRef, path: String, display: &str) -> String {
        match self.style {
            LinkStyle::Wiki => {
                let target = if Category::of(file.extension()) == Category::Markdown {
                    path[..path.len() - file.extension().len() - 1].to_string()
                } else {
                    path
                };
                if display.is_empty() {
                    format!("[[{}]]", target)
                } else {
                    format!("[[{}|{}]]", target, display)
                }
            }
            LinkStyle::Markdown => {
                let text = if display.is_empty() {
                    file.basename()
                } else {
                    display
                };
                format!("[{}]({})", text, utf8_percent_encode(&path, LINK_DESTINATION))
            }
        }
    }
}

impl LinkHost for VaultLinkHost {
    fn generate_markdown_link(&self, file: &FileRef, _source_path: &str, display: &str) -> String {
        self.format(file, self.link_path(file), display)
    }

    /// With shortest paths, the bare name and the full path are both candidates.
    fn markdown_link_forms(&self, file: &FileRef, _source_path: &str, display: &str) -> Vec<String> {
        let current = self.link_path(file);
        let mut forms = vec![self.format(file, current.clone(), display)];
        if self.path_mode == LinkPathMode::Shortest {
            let other = if current == file.name() {
                file.path()
            } else {
                file.name()
            };
            if other != current {
                forms.push(self.format(file, other.to_string(), display));
            }
        }
        forms
    }
}

/// Select the formatter for a vault once, at startup.
pub fn build_formatter(
    config: &LinkConfig,
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
) -> Box<dyn LinkFormatter> {
    match config.strategy {
        LinkStrategy::Fallback => Box::new(EmbedLinkFormatter),
        LinkStrategy::Host => Box::new(HostLinkFormatter::new(VaultLinkHost::new(
            root,
            fs,
            config.style,
            config.path,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::PhysicalFileSystem;
    use tempfile::TempDir;

    fn host(dir: &TempDir, style: LinkStyle, path_mode: LinkPathMode) -> HostLinkFormatter<VaultLinkHost> {
        HostLinkFormatter::new(VaultLinkHost::new(
            dir.path().to_path_buf(),
            Arc::new(PhysicalFileSystem::new()),
            style,
            path_mode,
        ))
    }

    #[test]
    fn test_embed_formatter() {
        let f = EmbedLinkFormatter;
        assert_eq!(f.link_for(&FileRef::new("notes/note-a.md"), "x.md"), "[[note-a]]");
        assert_eq!(f.link_for(&FileRef::new("photo.png"), "x.md"), "![[photo.png|50]]");
        assert_eq!(f.link_for(&FileRef::new("img/Scan.JPG"), "x.md"), "![[img/Scan.JPG|50]]");
        assert_eq!(f.link_for(&FileRef::new("docs/paper.pdf"), "x.md"), "![[docs/paper.pdf]]");
        assert_eq!(f.link_for(&FileRef::new("board.excalidraw"), "x.md"), "![[board.excalidraw]]");
    }

    #[test]
    fn test_embed_formatter_is_deterministic() {
        let f = EmbedLinkFormatter;
        let file = FileRef::new("a/b/clip.mp4");
        assert_eq!(f.link_for(&file, "x.md"), f.link_for(&file, "x.md"));
    }

    #[test]
    fn test_host_wiki_shortest() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        fs.create_file(&dir.path().join("projects/plan.md"), "").unwrap();
        fs.create_file(&dir.path().join("a/dup.png"), "").unwrap();
        fs.create_file(&dir.path().join("b/dup.png"), "").unwrap();

        let f = host(&dir, LinkStyle::Wiki, LinkPathMode::Shortest);
        assert_eq!(f.link_for(&FileRef::new("projects/plan.md"), "2024-05-01.md"), "[[plan]]");
        assert_eq!(f.link_for(&FileRef::new("a/dup.png"), "2024-05-01.md"), "[[a/dup.png]]");
    }

    #[test]
    fn test_host_link_is_stable_after_deletion() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        let path = dir.path().join("deep/only.pdf");
        fs.create_file(&path, "").unwrap();

        let f = host(&dir, LinkStyle::Wiki, LinkPathMode::Shortest);
        let file = FileRef::new("deep/only.pdf");
        let on_create = f.link_for(&file, "2024-05-01.md");
        std::fs::remove_file(&path).unwrap();
        assert_eq!(f.link_for(&file, "2024-05-01.md"), on_create);
    }

    #[test]
    fn test_shortest_link_forms_cover_both_paths() {
        let dir = TempDir::new().unwrap();
        let fs = PhysicalFileSystem::new();
        fs.create_file(&dir.path().join("a/dup.png"), "").unwrap();
        fs.create_file(&dir.path().join("b/dup.png"), "").unwrap();

        let f = host(&dir, LinkStyle::Wiki, LinkPathMode::Shortest);
        assert_eq!(
            f.link_forms(&FileRef::new("a/dup.png"), "2024-05-01.md"),
            vec!["[[a/dup.png]]".to_string(), "[[dup.png]]".to_string()]
        );
        assert_eq!(
            f.link_forms(&FileRef::new("top.png"), "2024-05-01.md"),
            vec!["[[top.png]]".to_string()]
        );

        let absolute = host(&dir, LinkStyle::Wiki, LinkPathMode::Absolute);
        assert_eq!(
            absolute.link_forms(&FileRef::new("a/dup.png"), "2024-05-01.md"),
            vec!["[[a/dup.png]]".to_string()]
        );
    }

    #[test]
    fn test_host_markdown_absolute() {
        let dir = TempDir::new().unwrap();
        let f = host(&dir, LinkStyle::Markdown, LinkPathMode::Absolute);
        assert_eq!(
            f.link_for(&FileRef::new("My Notes/idea (1).md"), "2024-05-01.md"),
            "[idea (1)](My%20Notes/idea%20%281%29.md)"
        );
    }

    #[test]
    fn test_build_formatter_selects_strategy() {
        let dir = TempDir::new().unwrap();
        let fs: Arc<dyn FileSystem> = Arc::new(PhysicalFileSystem::new());
        let file = FileRef::new("pic.gif");

        let fallback = build_formatter(&LinkConfig::default(), dir.path().to_path_buf(), fs.clone());
        assert_eq!(fallback.link_for(&file, "n.md"), "![[pic.gif|50]]");

        let config = LinkConfig {
            strategy: LinkStrategy::Host,
            ..LinkConfig::default()
        };
        let hosted = build_formatter(&config, dir.path().to_path_buf(), fs);
        assert_eq!(hosted.link_for(&file, "n.md"), "[[pic.gif]]");
    }
}
