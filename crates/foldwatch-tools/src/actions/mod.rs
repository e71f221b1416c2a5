//! Predefined file actions.
//!
//! Each action wraps one external tool invocation:
//! - `compress`: lossy re-encode of png/jpg/jpeg/webp in place
//! - `convert-webp`, `convert-mp4`, `convert-mp3`: format conversion that
//!   removes the original once the tool succeeded
//! - `resize-50`, `resize-25`: in-place downscale

mod compress;
mod convert;
mod resize;

pub use compress::compress;
pub use convert::{convert, ConversionTarget};
pub use resize::resize;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use foldwatch_common::paths::lowercase_extension;

use crate::{CommandRunner, Error, Result};

/// The fixed catalog of named transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedAction {
    Compress,
    ConvertWebp,
    ConvertMp4,
    ConvertMp3,
    Resize50,
    Resize25,
}

impl PredefinedAction {
    /// Every predefined action, in catalog order.
    pub const ALL: [PredefinedAction; 6] = [
        PredefinedAction::Compress,
        PredefinedAction::ConvertWebp,
        PredefinedAction::ConvertMp4,
        PredefinedAction::ConvertMp3,
        PredefinedAction::Resize50,
        PredefinedAction::Resize25,
    ];

    /// The name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            PredefinedAction::Compress => "compress",
            PredefinedAction::ConvertWebp => "convert-webp",
            PredefinedAction::ConvertMp4 => "convert-mp4",
            PredefinedAction::ConvertMp3 => "convert-mp3",
            PredefinedAction::Resize50 => "resize-50",
            PredefinedAction::Resize25 => "resize-25",
        }
    }

    fn conversion_target(&self) -> Option<ConversionTarget> {
        match self {
            PredefinedAction::ConvertWebp => Some(ConversionTarget::Webp),
            PredefinedAction::ConvertMp4 => Some(ConversionTarget::Mp4),
            PredefinedAction::ConvertMp3 => Some(ConversionTarget::Mp3),
            _ => None,
        }
    }

    /// Extension of the file this action leaves behind for `file`: the
    /// conversion target, or the file's own extension for in-place actions.
    pub fn output_extension(&self, file: &Path) -> Option<String> {
        match self.conversion_target() {
            Some(target) => Some(target.extension().to_string()),
            None => lowercase_extension(file),
        }
    }

    /// Short description naming the action and its output extension, used
    /// to register likely outputs before the action runs.
    pub fn output_descriptor(&self, file: &Path) -> String {
        match self.output_extension(file) {
            Some(ext) => format!("{} -> .{}", self.name(), ext),
            None => self.name().to_string(),
        }
    }

    /// Run the action on `file`.
    pub fn run(&self, runner: &dyn CommandRunner, file: &Path) -> Result<()> {
        match self {
            PredefinedAction::Compress => compress(runner, file),
            PredefinedAction::ConvertWebp => convert(runner, file, ConversionTarget::Webp).map(|_| ()),
            PredefinedAction::ConvertMp4 => convert(runner, file, ConversionTarget::Mp4).map(|_| ()),
            PredefinedAction::ConvertMp3 => convert(runner, file, ConversionTarget::Mp3).map(|_| ()),
            PredefinedAction::Resize50 => resize(runner, file, 50),
            PredefinedAction::Resize25 => resize(runner, file, 25),
        }
    }
}

impl fmt::Display for PredefinedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredefinedAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid_input(format!("unknown action: {s}")))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for action in PredefinedAction::ALL {
            assert_eq!(action.name().parse::<PredefinedAction>().unwrap(), action);
        }
        assert_eq!(
            "Convert-WebP".parse::<PredefinedAction>().unwrap(),
            PredefinedAction::ConvertWebp
        );
        assert!(matches!(
            "sharpen".parse::<PredefinedAction>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_output_descriptor() {
        let file = Path::new("/in/photo.PNG");
        assert_eq!(
            PredefinedAction::ConvertWebp.output_descriptor(file),
            "convert-webp -> .webp"
        );
        assert_eq!(
            PredefinedAction::Resize50.output_descriptor(file),
            "resize-50 -> .png"
        );
        assert_eq!(
            PredefinedAction::Compress.output_descriptor(Path::new("/in/README")),
            "compress"
        );
    }
}
