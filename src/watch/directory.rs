//! One filesystem watch on one bound directory.

use crate::config::Binding;
use crate::executor::ActionExecutor;
use foldwatch_common::{Error, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Bindings per watched directory, in configuration order.
pub(crate) type BindingTable = Arc<RwLock<HashMap<PathBuf, Vec<Binding>>>>;

/// Turns surviving create events into per-file processing tasks.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    pub(crate) executor: Arc<ActionExecutor>,
    pub(crate) bindings: BindingTable,
    pub(crate) settle_delay: Duration,
}

impl Dispatcher {
    /// Schedule every binding of `dir` on `file` after the settle delay.
    ///
    /// The bindings are captured now, so a reload that happens during the
    /// settle delay does not affect this file.
    fn dispatch(&self, dir: &Path, file: PathBuf) {
        if self.executor.suppressor().is_suppressed(&file) {
            tracing::debug!(file = %file.display(), "Ignoring self-produced output");
            return;
        }

        let bindings = match self.bindings.read().get(dir) {
            Some(bindings) if !bindings.is_empty() => bindings.clone(),
            _ => return,
        };

        tracing::debug!(file = %file.display(), bindings = bindings.len(), "New file");

        let executor = self.executor.clone();
        let settle_delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(settle_delay).await;

            let result = tokio::task::spawn_blocking(move || {
                for binding in &bindings {
                    executor.process(&file, binding);
                }
            })
            .await;

            if let Err(e) = result {
                tracing::error!(error = %e, "File processing task failed");
            }
        });
    }
}

/// A live watch. Dropping it stops the event loop and closes the watch.
pub(crate) struct DirectoryWatch {
    cancel: CancellationToken,
    _watcher: RecommendedWatcher,
}

impl DirectoryWatch {
    /// Start watching `dir` (non-recursively). Must be called from within a
    /// tokio runtime.
    pub(crate) fn open(dir: PathBuf, dispatcher: Dispatcher) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .map_err(|e| Error::watch_setup(&dir, e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::watch_setup(&dir, e.to_string()))?;

        let cancel = CancellationToken::new();
        tokio::spawn(event_loop(dir, rx, dispatcher, cancel.clone()));

        Ok(Self {
            cancel,
            _watcher: watcher,
        })
    }
}

impl Drop for DirectoryWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn event_loop(
    dir: PathBuf,
    mut rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    dispatcher: Dispatcher,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Some(Ok(event)) => {
                    if is_create(&event.kind) {
                        for path in event.paths {
                            dispatcher.dispatch(&dir, path);
                        }
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Watcher error");
                }
                None => break,
            }
        }
    }

    tracing::debug!(dir = %dir.display(), "Directory event loop stopped");
}

/// Whether `kind` announces a new file. Files renamed into the directory
/// count; the paired both-ends rename event does not, since its target is
/// also reported on its own.
pub(crate) fn is_create(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Any))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange};

    #[test]
    fn test_is_create() {
        assert!(is_create(&EventKind::Create(CreateKind::File)));
        assert!(is_create(&EventKind::Create(CreateKind::Any)));
        assert!(is_create(&EventKind::Modify(ModifyKind::Name(RenameMode::To))));

        assert!(!is_create(&EventKind::Modify(ModifyKind::Name(RenameMode::From))));
        assert!(!is_create(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))));
        assert!(!is_create(&EventKind::Modify(ModifyKind::Data(DataChange::Any))));
        assert!(!is_create(&EventKind::Remove(notify::event::RemoveKind::File)));
    }
}
