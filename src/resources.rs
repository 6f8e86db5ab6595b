// ABOUTME: Resource handling for the code-walk application
// ABOUTME: Loads source listings, CSS and JavaScript from local files or remote URLs

use crate::errors::{WalkError, Result};
use log::info;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const FETCH_ATTEMPTS: u32 = 3;

/// Represents a resource file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
    pub timeout_ms: u64,
}

/// Kind of HTML tag a resource is included with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Css,
    Js,
}

impl ResourceFile {
    /// Create a new ResourceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Resolve a path written inside a script. Relative local paths are
    /// taken relative to `base_dir`; URLs and absolute paths are kept.
    pub fn resolve(path: &str, base_dir: &Path) -> Self {
        let resource = Self::new(path);
        if resource.is_remote || Path::new(path).is_absolute() {
            return resource;
        }
        Self::new(&base_dir.join(path).to_string_lossy())
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Get the content of the resource file.
    /// If the file is remote, it will be fetched from the URL.
    /// If the file is local, it will be read from the filesystem.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote_content(&self) -> Result<String> {
        let url = Url::parse(&self.path)
            .map_err(|e| WalkError::InvalidResourcePath(format!("{}: {}", self.path, e)))?;
        info!("Fetching remote resource: {}", url);

        let client = Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()?;

        let mut retry_delay = 500;
        let mut last_error = None;

        for attempt in 1..=FETCH_ATTEMPTS {
            match client.get(url.clone()).send() {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text()?);
                }
                Ok(response) => {
                    last_error = Some(WalkError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => {
                    last_error = Some(WalkError::FetchError(e));
                }
            }

            if attempt < FETCH_ATTEMPTS {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            WalkError::ValidationError("Unknown error fetching resource".to_string())
        }))
    }

    /// Read content from a local file
    fn read_local_content(&self) -> Result<String> {
        info!("Reading local resource: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(WalkError::PathNotFoundError(path.to_path_buf()));
        }

        Ok(fs::read_to_string(path)?)
    }

    /// Generate HTML tag for the resource, either embedding or linking the content.
    pub fn tag(&self, kind: ResourceKind, embed: bool) -> Result<String> {
        if self.is_remote || !embed {
            Ok(match kind {
                ResourceKind::Css => format!(r#"<link rel="stylesheet" href="{}">"#, self.path),
                ResourceKind::Js => format!(r#"<script src="{}"></script>"#, self.path),
            })
        } else {
            let content = self.content()?;
            Ok(match kind {
                ResourceKind::Css => format!("<style>{}</style>", content),
                ResourceKind::Js => format!("<script>{}</script>", content),
            })
        }
    }
}
