// ABOUTME: Configuration module for the code-walk application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::{Result, WalkError};
use crate::html::HtmlConfig;
use crate::render::RenderConfig;
use crate::resources::ResourceFile;
use std::env;

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_PORT: u16 = 8080;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub css_files: Vec<String>,
    pub js_files: Vec<String>,
    pub embed_resources: bool,
    pub fetch_timeout_ms: u64,
    /// Lines of context around the highlighted span in the terminal; `None` shows everything
    pub context_lines: Option<usize>,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            css_files: Vec::new(),
            js_files: Vec::new(),
            embed_resources: true,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            context_lines: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let css_files = lookup("CODEWALK_CSS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.css_files);
        let js_files = lookup("CODEWALK_JS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.js_files);
        let embed_resources = lookup("EMBED_RESOURCES")
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.embed_resources);
        let fetch_timeout_ms = parse_var(&lookup, "FETCH_TIMEOUT_MS")?
            .unwrap_or(defaults.fetch_timeout_ms);
        let context_lines = parse_var(&lookup, "CONTEXT_LINES")?;
        let port = parse_var(&lookup, "CODEWALK_PORT")?.unwrap_or(defaults.port);

        Ok(Self {
            css_files,
            js_files,
            embed_resources,
            fetch_timeout_ms,
            context_lines,
            port,
        })
    }

    /// Turn a path or URL into a resource using the configured fetch timeout
    pub fn resource(&self, path: &str) -> ResourceFile {
        ResourceFile::new(path).with_timeout(self.fetch_timeout_ms)
    }

    /// Get a render configuration with defaults from this config
    pub fn get_render_config(
        &self,
        context_lines: Option<usize>,
        line_numbers: Option<bool>,
        color: Option<bool>,
    ) -> RenderConfig {
        RenderConfig {
            context_lines: context_lines.or(self.context_lines),
            line_numbers: line_numbers.unwrap_or(true),
            color: color.unwrap_or(false),
        }
    }

    /// Get an HTML configuration, preferring explicit resources over configured ones
    pub fn get_html_config(
        &self,
        title: Option<String>,
        css: Option<Vec<String>>,
        js: Option<Vec<String>>,
        embed_resources: Option<bool>,
    ) -> HtmlConfig {
        let css = css.unwrap_or_else(|| self.css_files.clone());
        let js = js.unwrap_or_else(|| self.js_files.clone());
        HtmlConfig {
            title: title.unwrap_or_else(|| "Code Walkthrough".to_string()),
            css_files: css.iter().map(|p| self.resource(p)).collect(),
            js_files: js.iter().map(|p| self.resource(p)).collect(),
            embed_resources: embed_resources.unwrap_or(self.embed_resources),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            WalkError::ConfigError(format!("{} has an invalid value: {:?}", key, raw))
        }),
    }
}
