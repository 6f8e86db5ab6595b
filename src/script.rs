// ABOUTME: Walkthrough script module for the code-walk application
// ABOUTME: Parses annotated range scripts and loads them into ready-to-step walkthroughs

use crate::config::Config;
use crate::errors::{Result, WalkError};
use crate::resources::ResourceFile;
use crate::source::SourceText;
use crate::stepper::{RangeAnnotation, RangeStepper};
use crate::utils;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed script, before its source listing is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub title: String,
    pub lang: Option<String>,
    pub source: String,
    pub annotations: Vec<RangeAnnotation>,
}

/// A script together with its loaded source, positioned at the first step
#[derive(Debug, Clone)]
pub struct Walkthrough {
    pub title: String,
    pub lang: Option<String>,
    pub script_path: Option<PathBuf>,
    pub source: ResourceFile,
    pub stepper: RangeStepper,
}

impl Walkthrough {
    /// Read a script from disk, fetch its source and validate every range
    pub fn load(script_path: &Path, config: &Config) -> Result<Self> {
        info!("Loading walkthrough script: {:?}", script_path);
        if !script_path.exists() {
            return Err(WalkError::PathNotFoundError(script_path.to_path_buf()));
        }

        let text = fs::read_to_string(script_path)?;
        let script = parse_script(&text)?;

        let base_dir = utils::parent_or_current(script_path);
        let source = ResourceFile::resolve(&script.source, &base_dir)
            .with_timeout(config.fetch_timeout_ms);

        let mut walkthrough = Self::from_script(script, source)?;
        walkthrough.script_path = Some(script_path.to_path_buf());
        Ok(walkthrough)
    }

    /// Load the source named by an already parsed script
    pub fn from_script(script: Script, source: ResourceFile) -> Result<Self> {
        let text = SourceText::load(&source)?;
        Self::with_source(script, source, text)
    }

    /// Build from a script and a listing that is already in memory
    pub fn with_source(script: Script, source: ResourceFile, text: SourceText) -> Result<Self> {
        let stepper = RangeStepper::new(text, script.annotations)?;
        info!(
            "Walkthrough {:?} ready with {} steps",
            script.title,
            stepper.len()
        );
        Ok(Self {
            title: script.title,
            lang: script.lang,
            script_path: None,
            source,
            stepper,
        })
    }
}

/// Parse the text of a walkthrough script.
///
/// ```text
/// % Native Blink Sketch
/// % c
/// % arduino.example
///
/// # 0..12 Native Blink Sketch
///
/// # 0..1
/// Replaces every `LED_PIN` with `13`.
/// ```
pub fn parse_script(text: &str) -> Result<Script> {
    let mut frontmatter = Vec::new();
    let mut annotations = Vec::new();
    // Range, inline label and body lines of the step being read
    let mut pending: Option<(usize, usize, usize, Vec<String>)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if annotations.is_empty() && pending.is_none() {
            if let Some(value) = line.strip_prefix("% ") {
                frontmatter.push(value.trim().to_string());
                continue;
            }
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
        }

        if let Some(heading) = range_heading(line) {
            if let Some(step) = pending.take() {
                annotations.push(finish_step(step)?);
            }
            let (start, end, label) = parse_heading(heading, line_no)?;
            let body = label.into_iter().collect();
            pending = Some((line_no, start, end, body));
            continue;
        }

        match pending.as_mut() {
            Some((_, _, _, body)) => {
                if !line.is_empty() {
                    body.push(line.to_string());
                }
            }
            None => {
                return Err(WalkError::ScriptError {
                    line: line_no,
                    message: "text before the first range heading".to_string(),
                });
            }
        }
    }

    if let Some(step) = pending.take() {
        annotations.push(finish_step(step)?);
    }

    let (title, lang, source) = match frontmatter.as_slice() {
        [source] => (String::new(), None, source.clone()),
        [title, source] => (title.clone(), None, source.clone()),
        [title, lang, source] => (title.clone(), Some(lang.clone()), source.clone()),
        [] => {
            return Err(WalkError::ScriptError {
                line: 1,
                message: "missing `% <source>` frontmatter".to_string(),
            })
        }
        _ => {
            return Err(WalkError::ScriptError {
                line: 4,
                message: "frontmatter has more than title, language and source".to_string(),
            })
        }
    };

    if source.is_empty() {
        return Err(WalkError::ScriptError {
            line: frontmatter.len(),
            message: "empty source path".to_string(),
        });
    }

    Ok(Script {
        title,
        lang: lang.filter(|l| !l.is_empty()),
        source,
        annotations,
    })
}

fn finish_step((line_no, start, end, body): (usize, usize, usize, Vec<String>)) -> Result<RangeAnnotation> {
    if body.is_empty() {
        return Err(WalkError::ScriptError {
            line: line_no,
            message: "range has no label".to_string(),
        });
    }
    Ok(RangeAnnotation::new(start, end, body.join(" ")))
}

/// The heading text after `#`, when the line opens a new range.
/// Lines like `#define X` or `#include <Servo.h>` stay label text.
fn range_heading(line: &str) -> Option<&str> {
    let heading = line.strip_prefix('#')?.trim();
    heading
        .starts_with(|c: char| c.is_ascii_digit() || c == '[')
        .then_some(heading)
}

/// Split a heading such as `0..12 Title`, `[2, 5]` or `6-12` into range and inline label
fn parse_heading(heading: &str, line_no: usize) -> Result<(usize, usize, Option<String>)> {
    let script_error = |message: String| WalkError::ScriptError {
        line: line_no,
        message,
    };

    let (range, rest) = if let Some(inner) = heading.strip_prefix('[') {
        let close = inner
            .find(']')
            .ok_or_else(|| script_error("unclosed `[` in range heading".to_string()))?;
        (&inner[..close], &inner[close + 1..])
    } else {
        match heading.find(char::is_whitespace) {
            Some(split) => (&heading[..split], &heading[split..]),
            None => (heading, ""),
        }
    };

    let (start, end) = range
        .split_once("..")
        .or_else(|| range.split_once(','))
        .or_else(|| range.split_once('-'))
        .ok_or_else(|| script_error(format!("expected `start..end`, found {:?}", range)))?;

    let parse_bound = |bound: &str| {
        bound
            .trim()
            .parse::<usize>()
            .map_err(|_| script_error(format!("invalid line number {:?}", bound.trim())))
    };

    let label = rest.trim();
    Ok((
        parse_bound(start)?,
        parse_bound(end)?,
        (!label.is_empty()).then(|| label.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLINK_SCRIPT: &str = "% Native Blink Sketch
% c
% arduino.example

# 0..12 Native Blink Sketch

# [0, 1]
Instructs compiler to replace all instances of `LED_PIN` with
`13`. More memory efficient than a variable declaration.

# 2-5
The setup function runs once when you press reset or power the board

# 6..12
The loop function runs over and over again forever
";

    #[test]
    fn test_parse_blink_script() {
        let script = parse_script(BLINK_SCRIPT).unwrap();
        assert_eq!(script.title, "Native Blink Sketch");
        assert_eq!(script.lang.as_deref(), Some("c"));
        assert_eq!(script.source, "arduino.example");
        assert_eq!(script.annotations.len(), 4);

        assert_eq!(
            script.annotations[0],
            RangeAnnotation::new(0, 12, "Native Blink Sketch")
        );
        assert_eq!(
            script.annotations[1].label,
            "Instructs compiler to replace all instances of `LED_PIN` with `13`. More memory efficient than a variable declaration."
        );
        assert_eq!(
            (script.annotations[2].start_line, script.annotations[2].end_line),
            (2, 5)
        );
        assert_eq!(script.annotations[3].end_line, 12);
    }

    #[test]
    fn test_source_only_frontmatter() {
        let script = parse_script("% serial.example\n# 0..9 Serial Monitoring\n").unwrap();
        assert_eq!(script.title, "");
        assert_eq!(script.lang, None);
        assert_eq!(script.source, "serial.example");
    }

    #[test]
    fn test_missing_frontmatter() {
        let err = parse_script("# 0..1 Note").unwrap_err();
        assert!(matches!(err, WalkError::ScriptError { line: 1, .. }));
    }

    #[test]
    fn test_bad_range_heading_reports_line() {
        let err = parse_script("% a.ino\n\n# 0..one Note\n").unwrap_err();
        match err {
            WalkError::ScriptError { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("invalid line number"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_preprocessor_lines_stay_in_label() {
        let script = parse_script(
            "% a.ino\n# 0..1\nThe #define directive\n#define is a macro\n#include <Servo.h> too\n# 1..2 Next\n",
        )
        .unwrap();
        assert_eq!(script.annotations.len(), 2);
        assert_eq!(
            script.annotations[0].label,
            "The #define directive #define is a macro #include <Servo.h> too"
        );
        assert_eq!(script.annotations[1], RangeAnnotation::new(1, 2, "Next"));
    }

    #[test]
    fn test_step_without_label() {
        let err = parse_script("% a.ino\n# 0..1\n# 1..2 Second\n").unwrap_err();
        assert!(matches!(err, WalkError::ScriptError { line: 2, .. }));
    }

    #[test]
    fn test_text_before_first_heading() {
        let err = parse_script("% a.ino\nstray words\n# 0..1 Note\n").unwrap_err();
        assert!(matches!(err, WalkError::ScriptError { line: 2, .. }));
    }

    #[test]
    fn test_load_resolves_source_next_to_script() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let code = (0..12).map(|i| format!("// {}", i)).collect::<Vec<_>>().join("\n");
        fs::write(dir.path().join("arduino.example"), code).unwrap();
        let script_path = dir.path().join("blink.walk");
        fs::write(&script_path, BLINK_SCRIPT).unwrap();

        let walkthrough = Walkthrough::load(&script_path, &Config::default()).unwrap();
        assert_eq!(walkthrough.title, "Native Blink Sketch");
        assert_eq!(walkthrough.stepper.len(), 4);
        assert_eq!(walkthrough.stepper.source().len(), 12);
        assert_eq!(walkthrough.script_path.as_deref(), Some(script_path.as_path()));
    }

    #[test]
    fn test_load_rejects_range_past_source() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("short.ino"), "a\nb\n").unwrap();
        let script_path = dir.path().join("short.walk");
        fs::write(&script_path, "% short.ino\n# 0..3 Too long\n").unwrap();

        let err = Walkthrough::load(&script_path, &Config::default()).unwrap_err();
        assert!(matches!(
            err,
            WalkError::InvalidRange { index: 0, start: 0, end: 3, len: 2 }
        ));
    }

    #[test]
    fn test_load_missing_script() {
        let err = Walkthrough::load(Path::new("/no/such/script.walk"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, WalkError::PathNotFoundError(_)));
    }
}
