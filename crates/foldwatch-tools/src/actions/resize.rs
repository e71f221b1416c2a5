//! In-place percentage downscale.

use std::path::Path;

use crate::{CommandRunner, Result, ToolCommand};

/// Resize `file` to `percent` of its size, overwriting it.
pub fn resize(runner: &dyn CommandRunner, file: &Path, percent: u8) -> Result<()> {
    let path = file.to_string_lossy().to_string();
    let command = ToolCommand::new("convert")
        .arg(path.as_str())
        .arg("-resize")
        .arg(format!("{percent}%"))
        .arg(path.as_str());

    runner.run(&command).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::FakeRunner;

    #[test]
    fn test_resize_args() {
        let runner = FakeRunner::default();
        resize(&runner, Path::new("/in/a.png"), 25).unwrap();
        assert_eq!(
            runner.calls()[0].get_args(),
            ["/in/a.png", "-resize", "25%", "/in/a.png"]
        );
    }
}
