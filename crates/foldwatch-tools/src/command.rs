//! Builder for executing external tool commands.

use std::fmt;
use std::process::{Command, Stdio};

use foldwatch_common::{Error, Result};

use crate::template::shell_quote;

/// Output captured from a successful tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// Arguments are passed to the program as a literal argument vector. Use
/// [`ToolCommand::shell`] when the command line must go through a shell
/// interpreter.
///
/// # Example
///
/// ```no_run
/// use foldwatch_tools::ToolCommand;
///
/// let output = ToolCommand::new("convert")
///     .arg("/in/a.png")
///     .args(["-resize", "50%"])
///     .arg("/in/a.png")
///     .execute()?;
/// println!("{}", output.stdout);
/// # Ok::<(), foldwatch_common::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Create a command that runs `script` through `interpreter -c`.
    pub fn shell(interpreter: impl Into<String>, script: impl Into<String>) -> Self {
        Self::new(interpreter).arg("-c").arg(script)
    }

    /// Append a single argument.
    pub fn arg(mut self, s: impl Into<String>) -> Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// The program that will be spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument vector, excluding the program.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Spawn the process, wait for it and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tool`] if spawning fails or the process exits with a
    /// non-zero status (message includes stderr).
    pub fn execute(&self) -> Result<ToolOutput> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::tool_failed(&self.program, format!("failed to spawn: {e}")))?;

        let tool_output = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            return Err(Error::tool_failed(
                &self.program,
                format!(
                    "exited with status {}: {}",
                    output.status,
                    tool_output.stderr.trim()
                ),
            ));
        }

        Ok(tool_output)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}
