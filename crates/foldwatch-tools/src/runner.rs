//! The seam between actions and the processes they spawn.

use foldwatch_common::Result;

use crate::command::{ToolCommand, ToolOutput};

/// Runs external tool commands on behalf of actions.
///
/// Every invocation made by the predefined actions, custom templates and
/// desktop notifications goes through a runner, so an engine can be driven
/// against a recording implementation in tests.
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion. A non-zero exit is an error.
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;

    /// Whether `program` can be found on `PATH`.
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Runner that spawns real processes and blocks until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        tracing::debug!(command = %command, "Running external tool");
        command.execute()
    }
}
