//! Config Store: the mutation API used by the configuration front-ends.
//!
//! Every mutation rewrites the backing file atomically before returning, and
//! the new state is only adopted once that write succeeded.

use super::persist::{load_config, save_config};
use super::{ActionKind, Binding, FolderConfig};
use foldwatch_common::paths::expand_path;
use foldwatch_common::{Error, Result};
use std::path::{Path, PathBuf};

/// The folder configuration together with its backing file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: FolderConfig,
}

impl ConfigStore {
    /// Load the store at `path`, creating an empty one if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = load_config(&path)?;
        Ok(Self { path, config })
    }

    /// Re-read the backing file.
    pub fn reload(&mut self) -> Result<()> {
        self.config = load_config(&self.path)?;
        Ok(())
    }

    /// Replace the whole configuration and persist it.
    pub fn replace(&mut self, mut config: FolderConfig) -> Result<()> {
        config.normalize();
        self.commit(config)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current configuration.
    pub fn config(&self) -> &FolderConfig {
        &self.config
    }

    /// All bindings in configuration order.
    pub fn bindings(&self) -> &[Binding] {
        &self.config.folders
    }

    /// Distinct folder paths in order of first appearance.
    pub fn distinct_paths(&self) -> Vec<PathBuf> {
        self.config.distinct_paths()
    }

    /// Bindings for one folder, in configuration order.
    pub fn bindings_for_path(&self, path: impl AsRef<Path>) -> Vec<Binding> {
        self.config.bindings_for_path(&expand_path(path))
    }

    /// Add a binding, or replace the existing one with the same path, action
    /// name and verbatim command. The folder is created if it is missing.
    pub fn upsert_binding(
        &mut self,
        path: impl AsRef<Path>,
        kind: ActionKind,
        extensions: Vec<String>,
        keep_original: bool,
    ) -> Result<Binding> {
        let path = expand_path(path);
        std::fs::create_dir_all(&path)?;

        let binding = Binding::new(path, kind, extensions, keep_original);
        let mut config = self.config.clone();

        match config.folders.iter_mut().find(|b| b.same_action(&binding)) {
            Some(existing) => {
                tracing::debug!(path = %binding.path.display(), action = %binding.describe(), "Updating binding");
                *existing = binding.clone();
            }
            None => {
                tracing::debug!(path = %binding.path.display(), action = %binding.describe(), "Adding binding");
                config.folders.push(binding.clone());
            }
        }

        self.commit(config)?;
        Ok(binding)
    }

    /// Remove the first binding at `path` selected by `matcher` (its command
    /// if it has one, otherwise its action name).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no binding matches.
    pub fn remove_binding(&mut self, path: impl AsRef<Path>, matcher: &str) -> Result<Binding> {
        let path = expand_path(path);
        let index = self
            .config
            .folders
            .iter()
            .position(|b| b.path == path && b.matches(matcher))
            .ok_or_else(|| {
                Error::not_found(format!("action '{}' in {}", matcher, path.display()))
            })?;

        let mut config = self.config.clone();
        let removed = config.folders.remove(index);
        self.commit(config)?;
        Ok(removed)
    }

    /// Remove every binding at `path`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the folder has no bindings.
    pub fn remove_all_bindings_for_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = expand_path(path);
        let mut config = self.config.clone();
        let before = config.folders.len();
        config.folders.retain(|b| b.path != path);
        let removed = before - config.folders.len();

        if removed == 0 {
            return Err(Error::not_found(format!("folder {}", path.display())));
        }

        self.commit(config)?;
        Ok(removed)
    }

    fn commit(&mut self, config: FolderConfig) -> Result<()> {
        save_config(&self.path, &config)?;
        self.config = config;
        Ok(())
    }
}
