//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by directory discovery and tool invocation.
///
/// Everything else in `core` is total: pattern matching skips unparsable
/// globs and command synthesis cannot fail.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The chosen root (or CLI argument) does not name a directory.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// The external tool is not on PATH.
    #[error("Executable '{0}' not found. Install it first (npm install -g repomix)")]
    ToolNotFound(String),

    /// The tool was found but could not be launched.
    #[error("Failed to launch '{0}': {1}")]
    Launch(String, #[source] std::io::Error),
}
