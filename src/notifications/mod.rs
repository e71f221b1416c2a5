//! Desktop notifications for finished and failed jobs.
//!
//! Notifications are fire-and-forget: failures are logged and never retried.

use foldwatch_tools::{CommandRunner, ToolCommand};
use std::path::Path;
use std::sync::Arc;

/// Title shown on every notification.
pub const NOTIFICATION_TITLE: &str = "foldwatch";

/// A target for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Sends notifications through `notify-send`.
pub struct DesktopNotifier {
    runner: Arc<dyn CommandRunner>,
}

impl DesktopNotifier {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let command = ToolCommand::new("notify-send").arg(title).arg(message);
        if let Err(e) = self.runner.run(&command) {
            tracing::warn!(error = %e, "Failed to send desktop notification");
        }
    }
}

/// Message for a successfully processed file.
pub fn processed_message(file: &Path) -> String {
    format!("Processed: {}", display_name(file))
}

/// Message for a file whose action failed.
pub fn failed_message(file: &Path) -> String {
    format!("Failed: {}", display_name(file))
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}
