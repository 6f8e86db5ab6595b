// ABOUTME: Utility functions for the code-walk application
// ABOUTME: Provides path validation and input expansion helpers

use crate::errors::{Result, WalkError};
use log::debug;
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(WalkError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(WalkError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(WalkError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory_exists(parent),
        _ => Ok(()),
    }
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        WalkError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}

/// The directory holding `path`, or `.` for a bare file name
pub fn parent_or_current(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Expand each input as a glob pattern, keeping the order patterns were given in.
/// Plain paths are passed through so a missing file is reported by whoever opens it.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let mut matches: Vec<PathBuf> = glob::glob(pattern)
            .map_err(|e| WalkError::ValidationError(format!("Invalid glob pattern {:?}: {}", pattern, e)))?
            .flatten()
            .collect();
        if matches.is_empty() {
            debug!("Pattern {:?} matched nothing, using it as a path", pattern);
            paths.push(PathBuf::from(pattern));
        } else {
            matches.sort();
            paths.extend(matches);
        }
    }
    Ok(paths)
}
