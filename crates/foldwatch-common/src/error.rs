//! Error taxonomy shared by the config store, the watch engine and the tool
//! layer.
//!
//! Only [`Error::ConfigIo`], [`Error::ConfigFormat`] and [`Error::NotFound`]
//! are meant to reach a caller. Watch setup and tool failures are logged by
//! the engine and never stop it.

use std::path::{Path, PathBuf};

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing folder bindings or running actions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The persisted configuration could not be read or written.
    #[error("config I/O error at {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted configuration could not be parsed or serialized.
    #[error("invalid config at {}: {message}", path.display())]
    ConfigFormat { path: PathBuf, message: String },

    /// The requested binding or directory does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A directory could not be watched.
    #[error("cannot watch {}: {message}", path.display())]
    WatchSetup { path: PathBuf, message: String },

    /// An external tool could not be spawned or exited unsuccessfully.
    #[error("tool execution failed: {tool}: {message}")]
    Tool { tool: String, message: String },

    /// A required external tool is not installed.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config I/O error for the given store path.
    pub fn config_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a config format error for the given store path.
    pub fn config_format(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ConfigFormat {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a watch setup error.
    pub fn watch_setup(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::WatchSetup {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create an invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from running an external tool.
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Self::Tool { .. } | Self::ToolNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = Error::watch_setup("/srv/inbox", "permission denied");
        assert_eq!(err.to_string(), "cannot watch /srv/inbox: permission denied");
    }

    #[test]
    fn test_tool_error_classification() {
        assert!(Error::tool_failed("convert", "exit 1").is_tool_error());
        assert!(Error::tool_not_found("pngquant").is_tool_error());
        assert!(!Error::not_found("binding").is_tool_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
