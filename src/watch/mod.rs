//! Watch Manager: one filesystem watch per bound directory, hot-reloaded
//! from the folder configuration file.

mod directory;

use crate::config::{load_config, persist, Binding, FolderConfig};
use crate::executor::{ActionExecutor, DEFAULT_SHELL};
use crate::notifications::{DesktopNotifier, Notifier};
use crate::suppress::OutputSuppressor;
use directory::{BindingTable, DirectoryWatch, Dispatcher};
use foldwatch_common::{Error, Result};
use foldwatch_tools::{CommandRunner, SystemRunner};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default wait between a create event and processing.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    /// Wait after a create event (or a config change) before acting on it.
    pub settle_delay: Duration,
    /// Interpreter for custom command templates.
    pub shell: String,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl WatchSettings {
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

/// What a call to [`WatchManager::apply_config`] changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    pub opened: usize,
    pub closed: usize,
    pub kept: usize,
    /// Directories that could not be watched and were skipped.
    pub failed: usize,
}

/// Keeps the set of live watches in line with the folder configuration.
pub struct WatchManager {
    config_path: PathBuf,
    settings: WatchSettings,
    dispatcher: Dispatcher,
    watches: Mutex<HashMap<PathBuf, DirectoryWatch>>,
}

impl WatchManager {
    /// Manager running real tools and sending desktop notifications.
    pub fn new(config_path: impl Into<PathBuf>, settings: WatchSettings) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
        let notifier = Arc::new(DesktopNotifier::new(runner.clone()));
        Self::with_components(config_path, settings, runner, notifier)
    }

    /// Manager with a custom runner and notifier.
    pub fn with_components(
        config_path: impl Into<PathBuf>,
        settings: WatchSettings,
        runner: Arc<dyn CommandRunner>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let executor = ActionExecutor::new(runner, notifier, Arc::new(OutputSuppressor::new()))
            .with_shell(settings.shell.clone());

        let bindings: BindingTable = Arc::new(RwLock::new(HashMap::new()));
        let dispatcher = Dispatcher {
            executor: Arc::new(executor),
            bindings,
            settle_delay: settings.settle_delay,
        };

        Self {
            config_path: config_path.into(),
            settings,
            dispatcher,
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Directories currently watched, sorted.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.watches.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Bring the watch set in line with `config`.
    ///
    /// Watches for directories that are still bound keep running untouched.
    /// A directory that cannot be watched is logged and skipped; it is
    /// retried on the next call. Must be called from within a tokio runtime.
    pub fn apply_config(&self, config: &FolderConfig) -> ReloadSummary {
        let mut table: HashMap<PathBuf, Vec<Binding>> = HashMap::new();
        for binding in &config.folders {
            table
                .entry(binding.path.clone())
                .or_default()
                .push(binding.clone());
        }
        *self.dispatcher.bindings.write() = table;

        let desired = config.distinct_paths();
        let mut summary = ReloadSummary::default();
        let mut watches = self.watches.lock();

        watches.retain(|dir, _| {
            let keep = desired.contains(dir);
            if !keep {
                tracing::info!(dir = %dir.display(), "Stopped watching directory");
                summary.closed += 1;
            }
            keep
        });

        for dir in desired {
            if watches.contains_key(&dir) {
                summary.kept += 1;
                continue;
            }

            match DirectoryWatch::open(dir.clone(), self.dispatcher.clone()) {
                Ok(watch) => {
                    let actions: Vec<String> = config
                        .bindings_for_path(&dir)
                        .iter()
                        .map(Binding::describe)
                        .collect();
                    tracing::info!(
                        dir = %dir.display(),
                        actions = %actions.join(", "),
                        "Watching directory"
                    );
                    watches.insert(dir, watch);
                    summary.opened += 1;
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping directory");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Re-read the configuration file and apply it.
    pub fn reload(&self) -> Result<ReloadSummary> {
        let config = load_config(&self.config_path)?;
        let summary = self.apply_config(&config);
        tracing::info!(
            config = %self.config_path.display(),
            opened = summary.opened,
            closed = summary.closed,
            kept = summary.kept,
            failed = summary.failed,
            "Folder config reloaded"
        );
        Ok(summary)
    }

    /// Close every watch. Already-running file tasks are not affected.
    pub fn close_all(&self) {
        let closed = std::mem::take(&mut *self.watches.lock());
        if !closed.is_empty() {
            tracing::info!(count = closed.len(), "Closed all directory watches");
        }
    }

    /// Watch until `cancel` fires.
    ///
    /// The directory holding the configuration file is watched too, so
    /// writes and atomic replacements of the file trigger a reload after
    /// the settle delay. If that directory cannot be watched the bound
    /// folders are still served, without hot reload. Fails only if the
    /// configuration cannot be loaded.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let config = load_config(&self.config_path)?;

        let config_dir = persist::config_dir(&self.config_path).to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();
        let config_watcher = match watch_config_dir(&config_dir, tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(
                    dir = %config_dir.display(),
                    error = %e,
                    "Cannot watch folder config for changes, hot reload disabled"
                );
                None
            }
        };

        self.serve(&config, config_watcher, rx, cancel).await;
        Ok(())
    }

    async fn serve(
        &self,
        config: &FolderConfig,
        config_watcher: Option<RecommendedWatcher>,
        mut rx: ConfigEvents,
        cancel: CancellationToken,
    ) {
        let hot_reload = config_watcher.is_some();
        let summary = self.apply_config(config);
        tracing::info!(
            config = %self.config_path.display(),
            directories = summary.opened,
            failed = summary.failed,
            hot_reload,
            "Watch manager started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv(), if hot_reload => match received {
                    Some(Ok(event)) => {
                        if !self.is_config_change(&event) {
                            continue;
                        }

                        let cancelled = tokio::select! {
                            _ = cancel.cancelled() => true,
                            _ = tokio::time::sleep(self.settings.settle_delay) => false,
                        };
                        if cancelled {
                            break;
                        }

                        // One reload covers every event of the burst.
                        while rx.try_recv().is_ok() {}

                        if let Err(e) = self.reload() {
                            tracing::error!(
                                config = %self.config_path.display(),
                                error = %e,
                                "Failed to reload folder config, keeping current watches"
                            );
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Config watcher error");
                    }
                    None => break,
                }
            }
        }

        drop(config_watcher);
        self.close_all();
        tracing::info!("Watch manager stopped");
    }

    fn is_config_change(&self, event: &Event) -> bool {
        if !(event.kind.is_create() || event.kind.is_modify()) {
            return false;
        }

        let Some(config_name) = self.config_path.file_name() else {
            return false;
        };
        event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(config_name))
    }
}

type ConfigEvents = mpsc::UnboundedReceiver<notify::Result<Event>>;

/// Forward events for the entries of `dir` into `tx`.
fn watch_config_dir(
    dir: &Path,
    tx: mpsc::UnboundedSender<notify::Result<Event>>,
) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })
    .map_err(|e| Error::watch_setup(dir, e.to_string()))?;
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(|e| Error::watch_setup(dir, e.to_string()))?;
    Ok(watcher)
}

impl Drop for WatchManager {
    fn drop(&mut self) {
        self.close_all();
    }
}
