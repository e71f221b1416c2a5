//! Foldwatch-Common: Shared error types and path utilities.
//!
//! This crate provides functionality used by both the watch engine and the
//! tool layer:
//!
//! - **Error Handling**: The error taxonomy and result alias
//! - **Path Utilities**: Directory normalization and extension filter matching
//!
//! # Examples
//!
//! ```
//! use foldwatch_common::paths::matches_extension_filter;
//! use foldwatch_common::{Error, Result};
//! use std::path::Path;
//!
//! assert!(matches_extension_filter(Path::new("photo.png"), &["PNG".to_string()]));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("binding"))
//! }
//! ```

pub mod error;
pub mod paths;

pub use error::{Error, Result};
