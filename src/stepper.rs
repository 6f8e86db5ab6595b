// ABOUTME: Range stepper module for the code-walk application
// ABOUTME: Tracks the current annotated line range of a walkthrough and navigates between them

use crate::errors::{Result, WalkError};
use crate::source::SourceText;
use log::debug;

/// A labeled span of lines in a source listing. `end_line` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAnnotation {
    pub start_line: usize,
    pub end_line: usize,
    pub label: String,
}

impl RangeAnnotation {
    pub fn new(start_line: usize, end_line: usize, label: impl Into<String>) -> Self {
        Self {
            start_line,
            end_line,
            label: label.into(),
        }
    }

    fn fits(&self, line_count: usize) -> bool {
        self.start_line < self.end_line && self.end_line <= line_count
    }
}

/// What a renderer needs to paint one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepView<'a> {
    pub highlighted_lines: &'a [String],
    pub label: &'a str,
    pub start_line: usize,
    pub end_line: usize,
    /// Zero-based position of this step
    pub index: usize,
    pub total: usize,
}

/// Cursor over the annotations of a single walkthrough.
///
/// `next` and `previous` clamp at the ends instead of wrapping or failing;
/// `jump_to` rejects indices that do not name an annotation.
#[derive(Debug, Clone)]
pub struct RangeStepper {
    source: SourceText,
    annotations: Vec<RangeAnnotation>,
    current: usize,
}

impl RangeStepper {
    /// Create a stepper positioned at the first annotation.
    ///
    /// Fails with [`WalkError::InvalidRange`] if any annotation is empty,
    /// inverted, or reaches past the end of the source.
    pub fn new(source: SourceText, annotations: Vec<RangeAnnotation>) -> Result<Self> {
        if let Some((index, bad)) = annotations
            .iter()
            .enumerate()
            .find(|(_, a)| !a.fits(source.len()))
        {
            return Err(WalkError::InvalidRange {
                index,
                start: bad.start_line,
                end: bad.end_line,
                len: source.len(),
            });
        }

        debug!(
            "Created stepper with {} annotations over {} lines",
            annotations.len(),
            source.len()
        );

        Ok(Self {
            source,
            annotations,
            current: 0,
        })
    }

    /// Advance one step. No-op on the last step.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<StepView<'_>> {
        if !self.at_end() {
            self.current += 1;
        }
        self.current()
    }

    /// Go back one step. No-op on the first step.
    pub fn previous(&mut self) -> Option<StepView<'_>> {
        if !self.at_start() {
            self.current -= 1;
        }
        self.current()
    }

    /// Move to `index`; the position is untouched on error.
    pub fn jump_to(&mut self, index: usize) -> Result<StepView<'_>> {
        if index >= self.annotations.len() {
            return Err(WalkError::IndexOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len: self.annotations.len(),
            });
        }
        self.current = index;
        Ok(self.project(index))
    }

    pub fn current(&self) -> Option<StepView<'_>> {
        self.view(self.current)
    }

    /// The view of any step, independent of the current position
    pub fn view(&self, index: usize) -> Option<StepView<'_>> {
        (index < self.annotations.len()).then(|| self.project(index))
    }

    pub fn at_start(&self) -> bool {
        self.current == 0
    }

    pub fn at_end(&self) -> bool {
        self.current + 1 >= self.annotations.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.annotations.is_empty()).then_some(self.current)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn annotations(&self) -> &[RangeAnnotation] {
        &self.annotations
    }

    fn project(&self, index: usize) -> StepView<'_> {
        let annotation = &self.annotations[index];
        // Ranges were checked against the source in `new`
        let highlighted_lines =
            &self.source.lines()[annotation.start_line..annotation.end_line];
        StepView {
            highlighted_lines,
            label: &annotation.label,
            start_line: annotation.start_line,
            end_line: annotation.end_line,
            index,
            total: self.annotations.len(),
        }
    }
}
