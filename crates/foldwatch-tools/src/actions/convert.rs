//! Format conversions that replace the original file.

use std::path::{Path, PathBuf};

use crate::{CommandRunner, Result, ToolCommand};

/// Output formats reachable through the predefined conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTarget {
    /// WebP image via ImageMagick
    Webp,
    /// H.264/AAC video via ffmpeg
    Mp4,
    /// MP3 audio via ffmpeg
    Mp3,
}

impl ConversionTarget {
    /// Get the file extension for this target.
    pub fn extension(&self) -> &'static str {
        match self {
            ConversionTarget::Webp => "webp",
            ConversionTarget::Mp4 => "mp4",
            ConversionTarget::Mp3 => "mp3",
        }
    }

    fn command(&self, input: &str, output: &str) -> ToolCommand {
        match self {
            ConversionTarget::Webp => {
                ToolCommand::new("convert").args([input, "-quality", "80", output])
            }
            ConversionTarget::Mp4 => ToolCommand::new("ffmpeg").args([
                "-i", input, "-c:v", "libx264", "-c:a", "aac", "-y", output,
            ]),
            ConversionTarget::Mp3 => ToolCommand::new("ffmpeg").args([
                "-i",
                input,
                "-c:a",
                "libmp3lame",
                "-q:a",
                "2",
                "-y",
                output,
            ]),
        }
    }
}

/// Convert `file` next to itself and delete the original once the tool
/// succeeded. Returns the output path.
///
/// A failed tool leaves the original untouched. When the output path equals
/// the input (e.g. converting a `.webp` to WebP) nothing is deleted.
pub fn convert(runner: &dyn CommandRunner, file: &Path, target: ConversionTarget) -> Result<PathBuf> {
    let output = file.with_extension(target.extension());
    let input_str = file.to_string_lossy().to_string();
    let output_str = output.to_string_lossy().to_string();

    runner.run(&target.command(&input_str, &output_str))?;

    if output != file {
        if let Err(e) = std::fs::remove_file(file) {
            tracing::warn!(
                file = %file.display(),
                error = %e,
                "Converted, but failed to remove the original"
            );
        }
    }

    Ok(output)
}
