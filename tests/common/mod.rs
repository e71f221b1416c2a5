//! Shared test harness for integration tests.
//!
//! Provides a [`RecordingRunner`] that captures every external command
//! instead of running it, a [`RecordingNotifier`], and [`wait_for`] for
//! polling asynchronous watch results.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use foldwatch::config::{ActionKind, Binding, FolderConfig};
use foldwatch::notifications::Notifier;
use foldwatch::watch::{WatchManager, WatchSettings};
use foldwatch_common::{Error, Result};
use foldwatch_tools::{CommandRunner, ToolCommand, ToolOutput};

type Hook = Box<dyn Fn(&ToolCommand) + Send + Sync>;

/// Records commands instead of running them.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<ToolCommand>>,
    fail: bool,
    on_run: Option<Hook>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command fails with a tool error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Call `hook` with each command at the moment it would run.
    pub fn with_hook(hook: impl Fn(&ToolCommand) + Send + Sync + 'static) -> Self {
        Self {
            on_run: Some(Box::new(hook)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands rendered as one string each, e.g. `convert a.png ...`.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| {
                std::iter::once(c.program().to_string())
                    .chain(c.get_args().iter().cloned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        if let Some(hook) = &self.on_run {
            hook(command);
        }
        self.calls.lock().unwrap().push(command.clone());
        if self.fail {
            return Err(Error::tool_failed(command.program(), "exited with status 1"));
        }
        Ok(ToolOutput::default())
    }

    fn is_available(&self, _program: &str) -> bool {
        false
    }
}

/// Records notification messages.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// A manager with a 50ms settle delay and recording collaborators.
pub fn test_manager(
    config_path: PathBuf,
    runner: Arc<RecordingRunner>,
    notifier: Arc<RecordingNotifier>,
) -> Arc<WatchManager> {
    let settings = WatchSettings::default().with_settle_delay(Duration::from_millis(50));
    Arc::new(WatchManager::with_components(
        config_path,
        settings,
        runner,
        notifier,
    ))
}

/// A predefined-action binding with default options.
pub fn preset(path: impl Into<PathBuf>, action: &str) -> Binding {
    Binding::new(path, ActionKind::Predefined(action.into()), vec![], false)
}

pub fn config_of(bindings: Vec<Binding>) -> FolderConfig {
    FolderConfig { folders: bindings }
}

/// Poll `condition` every 20ms until it holds or `timeout` elapses.
pub async fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
