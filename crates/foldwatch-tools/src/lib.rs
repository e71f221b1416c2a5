//! # foldwatch-tools
//!
//! External tool plumbing for foldwatch.
//!
//! This crate provides:
//! - [`ToolCommand`], a builder for one external process invocation
//! - [`CommandRunner`], the seam through which every invocation goes, with
//!   [`SystemRunner`] spawning real processes
//! - Command templates: `{}`, `{name}`, `{ext}` and `{dir}` substitution for
//!   user-authored shell commands
//! - The predefined action catalog (`compress`, `convert-webp`,
//!   `convert-mp4`, `convert-mp3`, `resize-50`, `resize-25`)
//! - Availability checks for the tools those actions need
//!
//! ## Example
//!
//! ```no_run
//! use foldwatch_tools::{template, CommandRunner, SystemRunner, ToolCommand};
//! use std::path::Path;
//!
//! let script = template::expand("convert {} {dir}/{name}.webp", Path::new("/in/a.png"));
//! SystemRunner.run(&ToolCommand::shell("bash", script))?;
//! # Ok::<(), foldwatch_common::Error>(())
//! ```

pub mod actions;
mod command;
mod runner;
pub mod template;
pub mod tools;

// Re-exports
pub use actions::PredefinedAction;
pub use command::{ToolCommand, ToolOutput};
pub use foldwatch_common::{Error, Result};
pub use runner::{CommandRunner, SystemRunner};
pub use template::TemplateContext;
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
