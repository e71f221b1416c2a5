//! Configuration persistence with atomic whole-file rewrites.

use super::FolderConfig;
use foldwatch_common::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the persisted folder configuration.
pub const CONFIG_FILE_NAME: &str = "folders.toml";

/// Default location of the folder configuration.
pub fn default_config_path() -> PathBuf {
    let path = shellexpand::tilde("~/.config/foldwatch");
    PathBuf::from(path.as_ref()).join(CONFIG_FILE_NAME)
}

/// Load the folder configuration from `path`.
///
/// A missing file is not an error: an empty configuration is written to
/// `path` and returned.
pub fn load_config(path: &Path) -> Result<FolderConfig> {
    ensure_config_dir(path)?;

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(config = %path.display(), "No folder config found, creating an empty one");
            let config = FolderConfig::default();
            save_config(path, &config)?;
            return Ok(config);
        }
        Err(e) => return Err(Error::config_io(path, e)),
    };

    let mut config: FolderConfig =
        toml::from_str(&content).map_err(|e| Error::config_format(path, e.to_string()))?;
    config.normalize();

    Ok(config)
}

/// Replace the file at `path` with `config`.
///
/// The new content is written to a temporary file in the same directory and
/// renamed over the target, so readers never observe a partial write.
pub fn save_config(path: &Path, config: &FolderConfig) -> Result<()> {
    ensure_config_dir(path)?;

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::config_format(path, format!("failed to serialize: {e}")))?;

    let mut tmp = NamedTempFile::new_in(config_dir(path)).map_err(|e| Error::config_io(path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| Error::config_io(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::config_io(path, e))?;
    tmp.persist(path)
        .map_err(|e| Error::config_io(path, e.error))?;

    tracing::debug!(config = %path.display(), bindings = config.folders.len(), "Saved folder config");
    Ok(())
}

/// Directory holding the config file.
pub fn config_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn ensure_config_dir(path: &Path) -> Result<()> {
    let dir = config_dir(path);
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(dir).map_err(|e| Error::config_io(path, e))
}
