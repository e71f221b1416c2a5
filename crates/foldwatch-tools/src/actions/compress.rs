//! Lossy in-place re-encoding of common image formats.

use std::path::Path;

use foldwatch_common::paths::lowercase_extension;

use crate::{CommandRunner, Result, ToolCommand};

/// Compress `file` in place.
///
/// PNG goes through `pngquant` when it is installed and falls back to
/// ImageMagick's palette reduction. JPEG and WebP are re-encoded at quality
/// 75. Any other extension is left untouched and reported as success.
pub fn compress(runner: &dyn CommandRunner, file: &Path) -> Result<()> {
    let path = file.to_string_lossy().to_string();
    let ext = lowercase_extension(file).unwrap_or_default();

    let command = match ext.as_str() {
        "png" if runner.is_available("pngquant") => ToolCommand::new("pngquant").args([
            "--force",
            "--quality=65-80",
            "--output",
            path.as_str(),
            path.as_str(),
        ]),
        "png" => ToolCommand::new("convert").args([
            path.as_str(),
            "-strip",
            "-colors",
            "256",
            path.as_str(),
        ]),
        "jpg" | "jpeg" | "webp" => ToolCommand::new("convert").args([
            path.as_str(),
            "-strip",
            "-quality",
            "75",
            path.as_str(),
        ]),
        _ => {
            tracing::debug!(file = %file.display(), "No compressor for this format, skipping");
            return Ok(());
        }
    };

    runner.run(&command).map(|_| ())
}
