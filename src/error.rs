//! Custom error types and handling
//!
//! This module defines the harness error type. Every failure is local to a
//! single file operation or external process invocation; nothing is retried.

use std::path::PathBuf;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // File errors
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    // External process errors
    #[error("Command `{command}` failed with exit code {}", exit_code_label(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Data errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repeat count 2^{0} does not fit in memory")]
    RepeatOverflow(u32),

    // Chart errors
    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Captured process output, when this error came from an external command
    pub fn captured_output(&self) -> Option<(&str, &str)> {
        match self {
            AppError::CommandFailed { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
