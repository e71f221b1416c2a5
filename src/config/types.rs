use foldwatch_common::paths::{expand_path, normalize_extensions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The persisted list of folder bindings.
///
/// Order is presentation order only; every binding for a folder runs on
/// every new file in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FolderConfig {
    #[serde(default)]
    pub folders: Vec<Binding>,
}

/// One folder associated with one transformation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Binding {
    /// Absolute directory path. Several bindings may share it.
    pub path: PathBuf,

    /// Name of a predefined action, used when `command` is empty
    #[serde(default)]
    pub action: String,

    /// Custom command template; takes precedence over `action`
    #[serde(default)]
    pub command: String,

    /// Lowercase extensions to process (empty = all files)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Emit a desktop notification when processing finishes or fails
    #[serde(default)]
    pub notify: bool,

    /// Copy the file into `<path>/.originals` before transforming it
    #[serde(default)]
    pub keep_original: bool,
}

/// What a binding runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// A named entry of the predefined action catalog.
    Predefined(String),
    /// A command template executed through the shell.
    Command(String),
}

impl Binding {
    /// Create a binding with notifications enabled.
    pub fn new(
        path: impl Into<PathBuf>,
        kind: ActionKind,
        extensions: Vec<String>,
        keep_original: bool,
    ) -> Self {
        let (action, command) = match kind {
            ActionKind::Predefined(name) => (name, String::new()),
            ActionKind::Command(template) => (String::new(), template),
        };

        Self {
            path: path.into(),
            action,
            command,
            extensions: normalize_extensions(&extensions),
            notify: true,
            keep_original,
        }
    }

    /// The action to run. A non-empty command wins over the action name.
    pub fn kind(&self) -> ActionKind {
        if self.command.is_empty() {
            ActionKind::Predefined(self.action.clone())
        } else {
            ActionKind::Command(self.command.clone())
        }
    }

    /// Human readable summary for logs and listings.
    pub fn describe(&self) -> String {
        match self.kind() {
            ActionKind::Command(template) => format!("custom: {template}"),
            ActionKind::Predefined(name) => name,
        }
    }

    /// Whether `other` is the same binding for upsert purposes: same path,
    /// action name and verbatim command.
    pub fn same_action(&self, other: &Binding) -> bool {
        self.path == other.path && self.action == other.action && self.command == other.command
    }

    /// Whether this binding is selected by a removal matcher: the command
    /// when one is set, otherwise the action name.
    pub fn matches(&self, matcher: &str) -> bool {
        if self.command.is_empty() {
            !self.action.is_empty() && self.action == matcher
        } else {
            self.command == matcher
        }
    }
}

impl FolderConfig {
    /// Distinct folder paths in order of first appearance.
    pub fn distinct_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for binding in &self.folders {
            if !paths.contains(&binding.path) {
                paths.push(binding.path.clone());
            }
        }
        paths
    }

    /// All bindings registered for `path`, in configuration order.
    pub fn bindings_for_path(&self, path: &Path) -> Vec<Binding> {
        self.folders
            .iter()
            .filter(|b| b.path == path)
            .cloned()
            .collect()
    }

    /// Normalize paths and extension filters of hand-edited entries.
    pub(crate) fn normalize(&mut self) {
        for binding in &mut self.folders {
            binding.path = expand_path(&binding.path);
            binding.extensions = normalize_extensions(&binding.extensions);
        }
    }
}
