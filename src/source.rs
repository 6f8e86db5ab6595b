// ABOUTME: Source listing module for the code-walk application
// ABOUTME: Holds the immutable, shareable lines of a walkthrough's source code

use crate::errors::Result;
use crate::resources::ResourceFile;
use log::debug;
use std::sync::Arc;

/// An immutable listing of source lines.
///
/// Clones share the same storage, so several steppers can walk the same
/// listing without copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Arc<[String]>,
}

impl SourceText {
    /// Split raw text into lines. A trailing newline does not add an empty line.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        Self {
            lines: lines.into(),
        }
    }

    /// Read the listing from a local file or remote URL
    pub fn load(resource: &ResourceFile) -> Result<Self> {
        let content = resource.content()?;
        let source = Self::from_text(&content);
        debug!("Loaded {} source lines from {}", source.len(), resource.path);
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
