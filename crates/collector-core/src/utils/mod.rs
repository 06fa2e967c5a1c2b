use std::path::Path;

/// Normalize a root-relative path to the forward-slash form used in links.
///
/// Converts backslashes to forward slashes (Windows compatibility) and drops
/// any leading `./`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use collector_core::normalize_relative_path;
///
/// assert_eq!(normalize_relative_path(Path::new("foo/bar.md")), "foo/bar.md");
/// assert_eq!(normalize_relative_path(Path::new("./photo.png")), "photo.png");
/// # if cfg!(windows) {
/// #     assert_eq!(normalize_relative_path(Path::new("foo\\bar.md")), "foo/bar.md");
/// # }
/// ```
pub fn normalize_relative_path(path: &Path) -> String {
    let mut s = path.to_string_lossy().to_string();
    if std::path::MAIN_SEPARATOR == '\\' {
        s = s.replace('\\', "/");
    }
    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }
    s
}

/// Whether any segment of a normalized path is hidden (starts with `.`).
pub fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| segment.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_relative_path() {
        assert_eq!(normalize_relative_path(Path::new("a/b/c.png")), "a/b/c.png");
        assert_eq!(normalize_relative_path(Path::new("./././c.png")), "c.png");
        assert_eq!(normalize_relative_path(Path::new("")), "");
    }

    #[test]
    fn test_is_hidden_path() {
        assert!(is_hidden_path(".daily-collector.yaml"));
        assert!(is_hidden_path(".obsidian/workspace.json"));
        assert!(is_hidden_path("notes/.trash/old.md"));
        assert!(!is_hidden_path("notes/today.md"));
        assert!(!is_hidden_path("a.b/c.d.png"));
    }
}
