//! Output suppression: remembers files the engine itself is about to write so
//! that their create events are not processed again.
//!
//! Outputs are guessed textually. For every recognized media extension that
//! appears in a command template (or a predefined action's descriptor), the
//! path `<dir>/<name>.<ext>` is recorded. This can both miss outputs and
//! suppress unrelated files with a matching name.

use foldwatch_common::paths::OUTPUT_EXTENSIONS;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a recorded output suppresses create events at its path.
pub const SUPPRESSION_HORIZON: Duration = Duration::from_secs(10);

/// How long an entry is kept before it is evicted.
pub const RETENTION_HORIZON: Duration = Duration::from_secs(30);

/// Time-windowed set of likely self-produced output paths.
#[derive(Debug)]
pub struct OutputSuppressor {
    entries: Mutex<HashMap<PathBuf, Instant>>,
    suppress_for: Duration,
    retain_for: Duration,
}

impl Default for OutputSuppressor {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSuppressor {
    pub fn new() -> Self {
        Self::with_horizons(SUPPRESSION_HORIZON, RETENTION_HORIZON)
    }

    /// Use custom horizons. `retain_for` is raised to `suppress_for` if
    /// shorter.
    pub fn with_horizons(suppress_for: Duration, retain_for: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            suppress_for,
            retain_for: retain_for.max(suppress_for),
        }
    }

    /// Record `<dir>/<name>.<ext>` for every recognized extension mentioned in
    /// `descriptor`. Returns the recorded paths.
    pub fn mark_likely_outputs(&self, dir: &Path, name: &str, descriptor: &str) -> Vec<PathBuf> {
        let marked: Vec<PathBuf> = OUTPUT_EXTENSIONS
            .iter()
            .filter(|ext| descriptor.contains(&format!(".{ext}")))
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .collect();

        if marked.is_empty() {
            return marked;
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();
        for path in &marked {
            tracing::trace!(path = %path.display(), "Marked likely output");
            entries.insert(path.clone(), now);
        }

        marked
    }

    /// Whether a create event at `path` should be ignored. Evicts entries
    /// older than the retention horizon.
    pub fn is_suppressed(&self, path: &Path) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, marked_at| now.duration_since(*marked_at) <= self.retain_for);

        entries
            .get(path)
            .map(|marked_at| now.duration_since(*marked_at) < self.suppress_for)
            .unwrap_or(false)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_extensions_in_template() {
        let cache = OutputSuppressor::new();
        let marked = cache.mark_likely_outputs(
            Path::new("/tmp/x"),
            "photo",
            "convert {} {dir}/{name}.webp && rm {}",
        );
        assert_eq!(marked, vec![PathBuf::from("/tmp/x/photo.webp")]);
        assert!(cache.is_suppressed(Path::new("/tmp/x/photo.webp")));
        assert!(!cache.is_suppressed(Path::new("/tmp/x/photo.png")));
        assert!(!cache.is_suppressed(Path::new("/tmp/y/photo.webp")));
    }

    #[test]
    fn test_no_extension_marks_nothing() {
        let cache = OutputSuppressor::new();
        assert!(cache
            .mark_likely_outputs(Path::new("/tmp/x"), "photo", "gzip {}")
            .is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_jpeg_and_jpg_are_distinct() {
        let cache = OutputSuppressor::new();
        let marked = cache.mark_likely_outputs(Path::new("/d"), "a", "-o {dir}/{name}.jpeg");
        assert_eq!(marked, vec![PathBuf::from("/d/a.jpeg")]);
    }

    #[test]
    fn test_expires_after_horizon() {
        let cache =
            OutputSuppressor::with_horizons(Duration::from_millis(50), Duration::from_millis(200));
        cache.mark_likely_outputs(Path::new("/tmp/x"), "photo", "... {dir}/{name}.webp ...");
        assert!(cache.is_suppressed(Path::new("/tmp/x/photo.webp")));

        std::thread::sleep(Duration::from_millis(80));
        assert!(!cache.is_suppressed(Path::new("/tmp/x/photo.webp")));
        assert_eq!(cache.len(), 1);

        std::thread::sleep(Duration::from_millis(200));
        assert!(!cache.is_suppressed(Path::new("/tmp/x/photo.webp")));
        assert!(cache.is_empty());
    }
}
