// ABOUTME: Error types for the code-walk application
// ABOUTME: Provides structured error handling for loading, parsing and stepping walkthroughs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error(
        "Invalid range in annotation {index}: {start}..{end} does not fit a source of {len} lines"
    )]
    InvalidRange {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Step index {index} is out of range (walkthrough has {len} steps)")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Script error on line {line}: {message}")]
    ScriptError { line: usize, message: String },

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our WalkError
impl From<anyhow::Error> for WalkError {
    fn from(err: anyhow::Error) -> Self {
        WalkError::UnknownError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WalkError>;
