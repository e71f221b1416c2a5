//! Action Executor: applies one binding to one file.
//!
//! Missing files, directories, hidden files and files outside the binding's
//! extension filter are skipped silently. Otherwise the original is optionally
//! backed up into `.originals`, the likely outputs are registered with the
//! suppression cache, and the predefined action or the expanded command
//! template runs. The outcome is logged and, if the binding asks for it,
//! reported as a desktop notification.

use crate::config::{ActionKind, Binding};
use crate::notifications::{failed_message, processed_message, Notifier, NOTIFICATION_TITLE};
use crate::suppress::OutputSuppressor;
use foldwatch_common::paths::{file_stem_lossy, is_hidden, matches_extension_filter, ORIGINALS_DIR};
use foldwatch_common::{Error, Result};
use foldwatch_tools::{template, CommandRunner, PredefinedAction, ToolCommand};
use std::path::Path;
use std::sync::Arc;

/// Shell used for custom command templates.
pub const DEFAULT_SHELL: &str = "bash";

/// Why a file was not handed to the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file disappeared before processing started.
    Missing,
    Directory,
    /// The base name starts with a dot.
    Hidden,
    /// The extension is not in the binding's filter.
    Filtered,
}

/// Result of [`ActionExecutor::process`].
#[derive(Debug)]
pub enum ProcessOutcome {
    Skipped(SkipReason),
    Succeeded,
    Failed(Error),
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Succeeded)
    }
}

/// Runs bindings against files.
pub struct ActionExecutor {
    runner: Arc<dyn CommandRunner>,
    notifier: Arc<dyn Notifier>,
    suppressor: Arc<OutputSuppressor>,
    shell: String,
}

impl ActionExecutor {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        notifier: Arc<dyn Notifier>,
        suppressor: Arc<OutputSuppressor>,
    ) -> Self {
        Self {
            runner,
            notifier,
            suppressor,
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    /// Use a different shell interpreter for command templates.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn suppressor(&self) -> &Arc<OutputSuppressor> {
        &self.suppressor
    }

    /// Apply `binding` to `file`. Blocks until the external tool exits.
    pub fn process(&self, file: &Path, binding: &Binding) -> ProcessOutcome {
        if let Some(reason) = skip_reason(file, binding) {
            tracing::trace!(file = %file.display(), reason = ?reason, "Skipping file");
            return ProcessOutcome::Skipped(reason);
        }

        tracing::info!(file = %file.display(), action = %binding.describe(), "Processing");

        if binding.keep_original {
            backup_original(file, binding);
        }

        match self.run_action(file, binding) {
            Ok(()) => {
                tracing::info!(file = %file.display(), action = %binding.describe(), "Processed");
                if binding.notify {
                    self.notifier.notify(NOTIFICATION_TITLE, &processed_message(file));
                }
                ProcessOutcome::Succeeded
            }
            Err(e) => {
                tracing::error!(
                    file = %file.display(),
                    action = %binding.describe(),
                    error = %e,
                    "Action failed"
                );
                if binding.notify {
                    self.notifier.notify(NOTIFICATION_TITLE, &failed_message(file));
                }
                ProcessOutcome::Failed(e)
            }
        }
    }

    fn run_action(&self, file: &Path, binding: &Binding) -> Result<()> {
        let dir = file.parent().unwrap_or_else(|| Path::new(""));
        let name = file_stem_lossy(file);

        match binding.kind() {
            ActionKind::Command(raw) => {
                let script = template::expand(&raw, file);
                self.suppressor.mark_likely_outputs(dir, &name, &raw);
                tracing::debug!(file = %file.display(), script = %script, "Running custom command");
                self.runner
                    .run(&ToolCommand::shell(&self.shell, script))
                    .map(|_| ())
            }
            ActionKind::Predefined(action_name) => {
                let action: PredefinedAction = action_name.parse()?;
                self.suppressor
                    .mark_likely_outputs(dir, &name, &action.output_descriptor(file));
                action.run(self.runner.as_ref(), file)
            }
        }
    }
}

fn skip_reason(file: &Path, binding: &Binding) -> Option<SkipReason> {
    let metadata = match std::fs::metadata(file) {
        Ok(metadata) => metadata,
        Err(_) => return Some(SkipReason::Missing),
    };

    if metadata.is_dir() {
        return Some(SkipReason::Directory);
    }
    if is_hidden(file) {
        return Some(SkipReason::Hidden);
    }
    if !matches_extension_filter(file, &binding.extensions) {
        return Some(SkipReason::Filtered);
    }

    None
}

/// Copy `file` into `<binding.path>/.originals/`. Failures are logged only.
fn backup_original(file: &Path, binding: &Binding) {
    let Some(name) = file.file_name() else {
        return;
    };

    let backup_dir = binding.path.join(ORIGINALS_DIR);
    if let Err(e) = std::fs::create_dir_all(&backup_dir) {
        tracing::warn!(dir = %backup_dir.display(), error = %e, "Failed to create backup directory");
        return;
    }

    let backup = backup_dir.join(name);
    match std::fs::copy(file, &backup) {
        Ok(_) => tracing::debug!(backup = %backup.display(), "Backed up original"),
        Err(e) => {
            tracing::warn!(file = %file.display(), error = %e, "Failed to back up original")
        }
    }
}
