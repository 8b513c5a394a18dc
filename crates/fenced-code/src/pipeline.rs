//! Ordered preprocessing pipeline.
//!
//! Steps operate on the document as a sequence of lines and run in
//! registration order. A step is placed relative to the start, the end, or
//! another named step:
//!
//! ```
//! use fenced_code::{FencedBlockPreprocessor, HtmlStash, Pipeline, register_fenced_code};
//!
//! let mut pipeline = Pipeline::with_defaults();
//! register_fenced_code(&mut pipeline, FencedBlockPreprocessor::new()).unwrap();
//! assert_eq!(pipeline.names(), vec!["normalize_whitespace", "fenced_code_block"]);
//!
//! let mut stash = HtmlStash::new();
//! let lines = pipeline.run_text("~~~\r\n\tx\r\n~~~", &mut stash);
//! assert_eq!(stash.expand(&lines.join("\n")).trim(), "<pre><code>    x\n</code></pre>");
//! ```

use crate::error::PipelineError;
use crate::preprocessor::FencedBlockPreprocessor;
use crate::stash::{ContentStore, ETX, STX};

/// Default number of spaces a tab expands to.
pub const DEFAULT_TAB_LENGTH: usize = 4;

/// A named text-processing step over document lines.
pub trait Preprocessor {
    /// Unique step name used for placement.
    fn name(&self) -> &str;

    /// Transform the document.
    fn run(&mut self, lines: Vec<String>, store: &mut dyn ContentStore) -> Vec<String>;
}

/// Where to insert a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    /// Before every registered step.
    Start,
    /// After every registered step.
    End,
    /// Immediately before the named step.
    Before(&'a str),
    /// Immediately after the named step.
    After(&'a str),
}

/// Ordered collection of preprocessors.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Preprocessor>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.names())
            .finish()
    }
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with the standard whitespace normalization step.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut pipeline = Self::new();
        pipeline.steps.push(Box::new(NormalizeWhitespace::default()));
        pipeline
    }

    /// Register a step at the given placement.
    pub fn register(
        &mut self,
        step: impl Preprocessor + 'static,
        placement: Placement<'_>,
    ) -> Result<(), PipelineError> {
        let name = step.name().to_owned();
        if self.position(&name).is_some() {
            return Err(PipelineError::Duplicate(name));
        }

        let index = match placement {
            Placement::Start => 0,
            Placement::End => self.steps.len(),
            Placement::Before(anchor) => self.anchor_position(&name, anchor)?,
            Placement::After(anchor) => self.anchor_position(&name, anchor)? + 1,
        };

        tracing::debug!(step = %name, index, "Registered pipeline step");
        self.steps.insert(index, Box::new(step));
        Ok(())
    }

    /// Step names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Number of registered steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no steps are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order.
    pub fn run(&mut self, mut lines: Vec<String>, store: &mut dyn ContentStore) -> Vec<String> {
        for step in &mut self.steps {
            lines = step.run(lines, store);
        }
        lines
    }

    /// Split `text` into lines and run every step.
    pub fn run_text(&mut self, text: &str, store: &mut dyn ContentStore) -> Vec<String> {
        self.run(text.split('\n').map(str::to_owned).collect(), store)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.name() == name)
    }

    fn anchor_position(&self, step: &str, anchor: &str) -> Result<usize, PipelineError> {
        self.position(anchor)
            .ok_or_else(|| PipelineError::UnknownAnchor {
                step: step.to_owned(),
                anchor: anchor.to_owned(),
            })
    }
}

/// Register the fenced code step right after whitespace normalization.
pub fn register_fenced_code(
    pipeline: &mut Pipeline,
    preprocessor: FencedBlockPreprocessor,
) -> Result<(), PipelineError> {
    pipeline.register(
        preprocessor,
        Placement::After(FencedBlockPreprocessor::RUNS_AFTER),
    )
}

/// Normalizes line endings, tabs and blank lines.
///
/// - strips the placeholder markers (STX/ETX) so input cannot forge tokens
/// - converts `\r\n` and `\r` to line breaks
/// - expands tabs to tab stops
/// - empties lines that contain only whitespace
#[derive(Debug, Clone)]
pub struct NormalizeWhitespace {
    tab_length: usize,
}

impl Default for NormalizeWhitespace {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_LENGTH)
    }
}

impl NormalizeWhitespace {
    /// Step name.
    pub const NAME: &'static str = "normalize_whitespace";

    /// Create the step with the given tab width (minimum 1).
    #[must_use]
    pub fn new(tab_length: usize) -> Self {
        Self {
            tab_length: tab_length.max(1),
        }
    }

    fn normalize_line(&self, line: &str) -> String {
        let line = expand_tabs(line, self.tab_length);
        if line.trim().is_empty() {
            String::new()
        } else {
            line
        }
    }
}

impl Preprocessor for NormalizeWhitespace {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self, lines: Vec<String>, _store: &mut dyn ContentStore) -> Vec<String> {
        let text = lines
            .join("\n")
            .replace([STX, ETX], "")
            .replace("\r\n", "\n")
            .replace('\r', "\n");
        text.split('\n').map(|line| self.normalize_line(line)).collect()
    }
}

/// Expand tabs to the next multiple of `tab_length` columns.
fn expand_tabs(line: &str, tab_length: usize) -> String {
    if !line.contains('\t') {
        return line.to_owned();
    }

    let mut result = String::with_capacity(line.len() + tab_length);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = tab_length - column % tab_length;
            result.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            result.push(c);
            column += 1;
        }
    }
    result
}
