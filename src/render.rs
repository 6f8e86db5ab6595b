// ABOUTME: Terminal rendering module for the code-walk application
// ABOUTME: Paints the current step of a walkthrough as annotated, highlighted text

use crate::stepper::{RangeStepper, StepView};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Configuration for terminal rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Lines shown around the highlighted span; `None` shows the whole listing
    pub context_lines: Option<usize>,
    pub line_numbers: bool,
    pub color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            context_lines: None,
            line_numbers: true,
            color: false,
        }
    }
}

/// Render the stepper's current step
pub fn render_step(stepper: &RangeStepper, config: &RenderConfig) -> String {
    match stepper.current() {
        Some(view) => render_view(stepper.source().lines(), &view, config),
        None => "(no steps)\n".to_string(),
    }
}

/// Render one step view over the full listing it was taken from
pub fn render_view(lines: &[String], view: &StepView<'_>, config: &RenderConfig) -> String {
    let mut out = String::new();

    let header = format!("[{}/{}] {}", view.index + 1, view.total, view.label);
    if config.color {
        out.push_str(&format!("{}{}{}\n", BOLD, header, RESET));
    } else {
        out.push_str(&header);
        out.push('\n');
    }

    let (first, last) = match config.context_lines {
        Some(context) => (
            view.start_line.saturating_sub(context),
            view.end_line.saturating_add(context).min(lines.len()),
        ),
        None => (0, lines.len()),
    };
    let width = lines.len().to_string().len();

    if first > 0 {
        out.push_str("  ...\n");
    }

    for (number, line) in lines.iter().enumerate().take(last).skip(first) {
        let highlighted = number >= view.start_line && number < view.end_line;
        let marker = if highlighted { '>' } else { ' ' };
        let gutter = if config.line_numbers {
            format!("{} {:>width$} | ", marker, number + 1, width = width)
        } else {
            format!("{} ", marker)
        };

        match (config.color, highlighted) {
            (true, true) => out.push_str(&format!("{}{}{}{}\n", BOLD, gutter, line, RESET)),
            (true, false) => out.push_str(&format!("{}{}{}{}\n", DIM, gutter, line, RESET)),
            _ => {
                out.push_str(&gutter);
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    if last < lines.len() {
        out.push_str("  ...\n");
    }

    out
}
