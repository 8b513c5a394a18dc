//! Fenced block substitution.
//!
//! Replaces every fenced block in a document with a placeholder for its
//! rendered HTML.

use crate::highlight::{HighlightConfig, Highlighter};
use crate::options::FenceOptions;
use crate::pipeline::Preprocessor;
use crate::render::BlockRenderer;
use crate::scanner::FenceScanner;
use crate::stash::ContentStore;

/// Preprocessor that swaps fenced code blocks for stashed HTML.
///
/// Blocks are handled in document order, so fragments are stored in the
/// order the blocks appear. Each placeholder ends up on its own line with a
/// blank line on either side.
///
/// # Example
///
/// ```
/// use fenced_code::{FencedBlockPreprocessor, HtmlStash, Preprocessor};
///
/// let lines = vec!["Intro".to_owned(), "```rust".to_owned(), "let x = 1;".to_owned(), "```".to_owned()];
/// let mut stash = HtmlStash::new();
/// let output = FencedBlockPreprocessor::new().run(lines, &mut stash);
///
/// assert_eq!(output.len(), 4);
/// assert_eq!(output[0], "Intro");
/// assert_eq!(
///     stash.expand(&output[2]),
///     r#"<pre><code class="rust">let x = 1;
/// </code></pre>"#
/// );
/// ```
#[derive(Debug, Default)]
pub struct FencedBlockPreprocessor {
    scanner: FenceScanner,
    renderer: BlockRenderer,
}

impl FencedBlockPreprocessor {
    /// Pipeline step name.
    pub const NAME: &'static str = "fenced_code_block";
    /// Step this preprocessor must run after.
    pub const RUNS_AFTER: &'static str = "normalize_whitespace";

    /// Create a preprocessor that renders plain `<pre><code>` blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render blocks through `highlighter`, with `config` supplying the
    /// defaults for options not set on the fence line.
    #[must_use]
    pub fn with_highlighter(
        mut self,
        highlighter: impl Highlighter + 'static,
        config: HighlightConfig,
    ) -> Self {
        self.renderer = self.renderer.with_highlighter(highlighter, config);
        self
    }

    /// Block renderer used for each block.
    #[must_use]
    pub fn renderer(&self) -> &BlockRenderer {
        &self.renderer
    }

    /// Replace fenced blocks in `text`, returning the new text and the
    /// number of blocks replaced.
    pub fn substitute(&self, text: &str, store: &mut dyn ContentStore) -> (String, usize) {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;
        let mut replaced = 0;

        for block in self.scanner.blocks(text) {
            let options = if block.options.is_empty() {
                FenceOptions::new()
            } else {
                FenceOptions::parse(block.options)
            };
            tracing::debug!(
                offset = block.start(),
                fence = block.fence,
                lang = options.lang(),
                "Replacing fenced code block"
            );

            let html = self.renderer.render(block.code, &options);
            let token = store.store(html, true);

            output.push_str(&text[cursor..block.start()]);
            output.push('\n');
            output.push_str(&token);
            output.push('\n');
            cursor = block.end();
            replaced += 1;
        }

        output.push_str(&text[cursor..]);
        (output, replaced)
    }
}

impl Preprocessor for FencedBlockPreprocessor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self, lines: Vec<String>, store: &mut dyn ContentStore) -> Vec<String> {
        let text = lines.join("\n");
        let (output, replaced) = self.substitute(&text, store);
        if replaced == 0 {
            return lines;
        }
        tracing::trace!(blocks = replaced, "Fenced code substitution finished");
        output.split('\n').map(str::to_owned).collect()
    }
}
