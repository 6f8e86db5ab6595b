// ABOUTME: Watch module for monitoring walkthrough scripts and regenerating the deck
// ABOUTME: Provides file watching, auto-regeneration and an optional preview server

use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, Debouncer, FileIdCache};
use tiny_http::{Header, Response, Server, StatusCode};

use crate::config::Config as AppConfig;
use crate::errors::{Result, WalkError};
use crate::html::{self, HtmlConfig};
use crate::script::Walkthrough;
use crate::utils;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Walkthrough scripts to watch, in deck order
    pub script_paths: Vec<PathBuf>,

    /// Output HTML file path
    pub html_output: PathBuf,

    pub html: HtmlConfig,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,

    /// Whether to serve the HTML using a local web server
    pub serve: bool,

    /// Port for local web server
    pub port: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            script_paths: Vec::new(),
            html_output: PathBuf::from("walkthrough.html"),
            html: HtmlConfig::default(),
            debounce_ms: 500,
            serve: false,
            port: 8080,
        }
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Map a request URL onto a file below `root`, refusing paths that climb out of it
fn resolve_request(root: &Path, index_name: &str, url_path: &str) -> Option<PathBuf> {
    let clean = url_path.split('?').next().unwrap_or("").trim_start_matches('/');
    if clean.is_empty() {
        return Some(root.join(index_name));
    }
    if clean.split('/').any(|part| part == "..") {
        return None;
    }
    Some(root.join(clean))
}

/// Start a simple HTTP server for the generated deck and the files next to it
fn start_server(html_path: &Path, port: u16) -> Result<()> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| WalkError::WatchError(format!("Failed to start HTTP server: {}", e)))?;

    let html_dir = match html_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let html_file_name = html_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    thread::spawn(move || {
        info!("HTTP server listening on http://localhost:{}", port);
        println!("Serving walkthrough on http://localhost:{}", port);

        for request in server.incoming_requests() {
            let url_path = request.url().to_string();
            let file_path = resolve_request(&html_dir, &html_file_name, &url_path);
            debug!("Request for {:?} -> {:?}", url_path, file_path);

            let result = match file_path {
                Some(path) if path.is_file() => match fs::read(&path) {
                    Ok(content) => {
                        let response = Response::from_data(content);
                        match Header::from_bytes("Content-Type", content_type(&path)) {
                            Ok(header) => request.respond(response.with_header(header)),
                            Err(_) => request.respond(response),
                        }
                    }
                    Err(e) => {
                        error!("Failed to read file {:?}: {}", path, e);
                        request.respond(
                            Response::from_string(format!("Failed to read file: {}", e))
                                .with_status_code(StatusCode(500)),
                        )
                    }
                },
                Some(_) => request.respond(
                    Response::from_string("404 Not Found").with_status_code(StatusCode(404)),
                ),
                None => request.respond(
                    Response::from_string("403 Forbidden").with_status_code(StatusCode(403)),
                ),
            };

            if let Err(e) = result {
                error!("Failed to send response: {}", e);
            }
        }
    });

    Ok(())
}

/// Watches the scripts and their sources, regenerating the deck when they change
pub fn watch_scripts(config: WatchConfig, app_config: &AppConfig) -> Result<()> {
    if config.script_paths.is_empty() {
        return Err(WalkError::ValidationError(
            "No walkthrough scripts to watch".to_string(),
        ));
    }
    for script in &config.script_paths {
        utils::validate_file_exists(script)?;
    }
    utils::ensure_parent_directory_exists(&config.html_output)?;

    // Initial generation must succeed; later failures are only logged
    let mut watched_sources = regenerate_outputs(&config, app_config)?;

    if config.serve {
        start_server(&config.html_output, config.port)?;
    }

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| WalkError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let mut watch_dirs: Vec<PathBuf> = Vec::new();
    let initial: Vec<PathBuf> = config
        .script_paths
        .iter()
        .chain(watched_sources.iter())
        .cloned()
        .collect();
    for dir in uncovered_dirs(&watch_dirs, &initial) {
        watch_dir(&mut debouncer, &dir)?;
        watch_dirs.push(dir);
    }

    info!("Watching for changes in {:?}", watch_dirs);
    println!(
        "Watching {} script(s) for changes (Press Ctrl+C to stop)",
        config.script_paths.len()
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let relevant = is_relevant_path(path, &config, &watched_sources);
                        if relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        relevant
                    })
                });

                let now = Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed) > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_outputs(&config, app_config) {
                        Ok(sources) => {
                            info!("Regenerated walkthrough deck successfully");
                            // An edited script may now point at a source in a new directory
                            for dir in uncovered_dirs(&watch_dirs, &sources) {
                                match watch_dir(&mut debouncer, &dir) {
                                    Ok(()) => watch_dirs.push(dir),
                                    Err(e) => error!("{}", e),
                                }
                            }
                            watched_sources = sources;
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate walkthrough deck: {}", e),
                    }
                }
            }
            Err(errors) => {
                for e in errors {
                    error!("Watch error: {:?}", e);
                }
            }
        }
    }

    Ok(())
}

fn watch_dir<W: Watcher, C: FileIdCache>(debouncer: &mut Debouncer<W, C>, dir: &Path) -> Result<()> {
    debug!("Watching absolute path: {:?}", dir);
    debouncer
        .watcher()
        .watch(dir, RecursiveMode::Recursive)
        .map_err(|e| WalkError::WatchError(format!("Failed to start watching {:?}: {}", dir, e)))
}

/// Directories holding `paths` that no entry of `watched` already covers
fn uncovered_dirs(watched: &[PathBuf], paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for path in paths {
        let dir = match utils::get_absolute_path(&utils::parent_or_current(path)) {
            Ok(dir) => dir,
            Err(e) => {
                debug!("Skipping watch for {:?}: {}", path, e);
                continue;
            }
        };
        if !watched.iter().chain(dirs.iter()).any(|d| dir.starts_with(d)) {
            dirs.push(dir);
        }
    }
    dirs
}

/// Checks whether a changed path should trigger regeneration
pub fn is_relevant_path(path: &Path, config: &WatchConfig, sources: &[PathBuf]) -> bool {
    // Writing the deck itself must not loop back into a rebuild
    if same_file(path, &config.html_output) {
        return false;
    }

    if config.script_paths.iter().any(|s| same_file(path, s)) {
        return true;
    }

    if sources.iter().any(|s| same_file(path, s)) {
        return true;
    }

    let local_resources = config
        .html
        .css_files
        .iter()
        .chain(config.html.js_files.iter())
        .filter(|r| !r.is_remote);
    for resource in local_resources {
        if same_file(path, Path::new(&resource.path)) {
            return true;
        }
    }

    false
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (utils::get_absolute_path(a), utils::get_absolute_path(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Rebuild the deck, returning the local source files the scripts pointed at
fn regenerate_outputs(config: &WatchConfig, app_config: &AppConfig) -> Result<Vec<PathBuf>> {
    info!("Regenerating walkthrough deck...");

    let walkthroughs = config
        .script_paths
        .iter()
        .map(|path| Walkthrough::load(path, app_config))
        .collect::<Result<Vec<_>>>()?;

    let html_content = html::generate_html(&walkthroughs, &config.html)?;
    html::write_html_to_file(&html_content, &config.html_output)?;
    info!("HTML regenerated: {:?}", config.html_output);

    Ok(walkthroughs
        .iter()
        .filter(|w| !w.source.is_remote)
        .map(|w| PathBuf::from(&w.source.path))
        .collect())
}
