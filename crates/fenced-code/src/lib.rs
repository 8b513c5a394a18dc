//! Fenced code blocks for line-oriented markdown preprocessing.
//!
//! This crate finds blocks delimited by matching runs of backticks or tildes,
//! parses the attributes on the opening fence, renders each block to HTML and
//! leaves a placeholder in the document for a later expansion pass.
//!
//! # Architecture
//!
//! - [`FenceOptions`]: Parses fence attributes (`python`, `.python`,
//!   `{.python hl_lines="1 3"}`) into typed options
//! - [`FenceScanner`]: Locates complete fenced blocks in a text buffer
//! - [`BlockRenderer`]: Delegates to a [`Highlighter`] or emits an escaped
//!   `<pre><code>` wrapper
//! - [`FencedBlockPreprocessor`]: Drives scan, parse, render and store over a
//!   whole document
//! - [`HtmlStash`]: Keeps rendered fragments behind placeholder tokens
//! - [`Pipeline`]: Ordered preprocessing steps; the fenced code step runs
//!   after [`NormalizeWhitespace`]
//!
//! # Example
//!
//! ```
//! use fenced_code::{
//!     CodeHilite, FencedBlockPreprocessor, HighlightConfig, HtmlStash, Pipeline,
//!     register_fenced_code,
//! };
//!
//! let markdown = "Some code:\n\n```{.python hl_lines=\"2\"}\nx = 1\ny = 2\n```\n";
//!
//! let mut pipeline = Pipeline::with_defaults();
//! let preprocessor =
//!     FencedBlockPreprocessor::new().with_highlighter(CodeHilite, HighlightConfig::default());
//! register_fenced_code(&mut pipeline, preprocessor).unwrap();
//!
//! let mut stash = HtmlStash::new();
//! let lines = pipeline.run_text(markdown, &mut stash);
//! let html = stash.expand(&lines.join("\n"));
//!
//! assert!(html.contains(r#"<code class="language-python">"#));
//! assert!(html.contains(r#"<span class="hll">y = 2</span>"#));
//! ```

mod boolean;
mod error;
mod highlight;
mod options;
mod pipeline;
mod preprocessor;
mod render;
mod scanner;
mod stash;

pub use boolean::parse_bool;
pub use error::PipelineError;
pub use highlight::{
    CodeHilite, DEFAULT_CSS_CLASS, DEFAULT_STYLE, HighlightConfig, HighlightRequest, Highlighter,
    parse_hl_lines,
};
pub use options::{
    CSS_CLASS, FenceOptions, GUESS_LANG, HL_LINES, LANG, LINENUMS, NOCLASSES, OptionValue,
    PYGMENTS_STYLE,
};
pub use pipeline::{
    DEFAULT_TAB_LENGTH, NormalizeWhitespace, Pipeline, Placement, Preprocessor,
    register_fenced_code,
};
pub use preprocessor::FencedBlockPreprocessor;
pub use render::{BlockRenderer, escape_code};
pub use scanner::{Blocks, FenceScanner, FencedBlock};
pub use stash::{ContentStore, ETX, HtmlStash, STX, StashedFragment, placeholder};
