//! Path utilities for folder bindings and extension filters.
//!
//! Directory keys are normalized so that `~/Pictures/inbox`,
//! `/home/me/Pictures/./inbox` and a relative spelling of the same folder all
//! collapse to one absolute path. Extension helpers implement the
//! case-insensitive filter matching used when deciding whether a binding
//! applies to a file.

use std::path::{Component, Path, PathBuf};

/// Media extensions recognized when guessing which files a command produces.
pub const OUTPUT_EXTENSIONS: &[&str] = &[
    "webp", "png", "jpg", "jpeg", "mp4", "mp3", "gif", "mov", "avi", "mkv",
];

/// Name of the per-folder directory holding backups of original files.
pub const ORIGINALS_DIR: &str = ".originals";

/// Normalize a user supplied directory path to an absolute key.
///
/// A leading `~` or `~/` is expanded to the home directory, relative paths are
/// resolved against the current directory, and `.`/`..` components are
/// removed lexically. Symlinks are not resolved.
///
/// # Examples
///
/// ```
/// use foldwatch_common::paths::expand_path;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_path("/srv/inbox/../drop/."), PathBuf::from("/srv/drop"));
/// ```
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let expanded = match path.to_str() {
        Some(s) if s == "~" || s.starts_with("~/") => {
            PathBuf::from(shellexpand::tilde(s).as_ref())
        }
        _ => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };

    clean(&absolute)
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.parent().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Normalize one extension filter entry: trimmed, lowercase, no leading dots.
///
/// ```
/// use foldwatch_common::paths::normalize_extension;
///
/// assert_eq!(normalize_extension(".PNG"), "png");
/// assert_eq!(normalize_extension("jpg"), "jpg");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Normalize a whole extension filter, dropping empties and duplicates while
/// keeping the original order.
pub fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = normalize_extension(ext.as_ref());
        if !ext.is_empty() && !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

/// Lowercase extension of a path, without the leading dot.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check a file against an extension filter. An empty filter matches
/// everything; entries may be written with or without a leading dot and in
/// any case.
///
/// ```
/// use foldwatch_common::paths::matches_extension_filter;
/// use std::path::Path;
///
/// assert!(matches_extension_filter(Path::new("a.png"), &[]));
/// assert!(matches_extension_filter(Path::new("a.png"), &[".PNG".to_string()]));
/// assert!(!matches_extension_filter(Path::new("a.gif"), &["png".to_string()]));
/// ```
pub fn matches_extension_filter(path: &Path, filter: &[String]) -> bool {
    if filter.is_empty() {
        return true;
    }

    match lowercase_extension(path) {
        Some(ext) => filter.iter().any(|f| normalize_extension(f) == ext),
        None => false,
    }
}

/// Whether the file name starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.as_encoded_bytes().first() == Some(&b'.'))
        .unwrap_or(false)
}

/// File name without its final extension, lossily converted.
pub fn file_stem_lossy(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
