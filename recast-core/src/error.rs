//! Error types shared across the recast-core library.
//!
//! Per-file stage failures are caught at stage boundaries and converted into
//! error records by the pipeline; only errors that prevent enumerating work
//! or persisting the final report abort a run.

use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for recast
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Required external tool not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Command '{cmd}' failed ({status}): {stderr}")]
    CommandFailed {
        cmd: String,
        status: String,
        stderr: String,
    },

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailFailed(String),

    #[error("Publish failed for '{key}': {message}")]
    PublishFailed { key: String, message: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for recast-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: &Path, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.display().to_string(), err)
}

/// Creates a `CommandFailed` error carrying the captured stderr text.
pub fn command_failed_error(cmd: &Path, status: ExitStatus, stderr: &str) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.display().to_string(),
        status: status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}")),
        stderr: stderr.trim().to_string(),
    }
}
