//! foldwatch - folder watching and automatic file transformations
//!
//! This library crate exposes the engine for the CLI and integration tests.

pub mod config;
pub mod executor;
pub mod notifications;
pub mod suppress;
pub mod watch;

pub use foldwatch_common::{Error, Result};
