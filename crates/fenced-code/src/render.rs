//! Block rendering.
//!
//! Turns a block body plus its options into an HTML fragment, either through
//! a configured [`Highlighter`] or as a minimal escaped `<pre><code>` wrapper.

use std::fmt;

use crate::highlight::{HighlightConfig, HighlightRequest, Highlighter, parse_hl_lines};
use crate::options::{CSS_CLASS, FenceOptions, GUESS_LANG, LINENUMS, NOCLASSES, PYGMENTS_STYLE};

/// Highlighter together with its caller-level defaults.
struct Highlighting {
    highlighter: Box<dyn Highlighter>,
    config: HighlightConfig,
}

/// Renders fenced block bodies to HTML fragments.
///
/// # Example
///
/// ```
/// use fenced_code::{BlockRenderer, FenceOptions};
///
/// let renderer = BlockRenderer::new();
/// let html = renderer.render("a < b\n", &FenceOptions::parse("rust"));
/// assert_eq!(html, "<pre><code class=\"rust\">a &lt; b\n</code></pre>");
/// ```
#[derive(Default)]
pub struct BlockRenderer {
    highlighting: Option<Highlighting>,
}

impl fmt::Debug for BlockRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRenderer")
            .field("highlight_config", &self.highlight_config())
            .finish()
    }
}

impl BlockRenderer {
    /// Create a renderer that emits plain `<pre><code>` blocks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegate rendering to `highlighter`, using `config` for options not
    /// set on the fence line.
    #[must_use]
    pub fn with_highlighter(
        mut self,
        highlighter: impl Highlighter + 'static,
        config: HighlightConfig,
    ) -> Self {
        self.highlighting = Some(Highlighting {
            highlighter: Box::new(highlighter),
            config,
        });
        self
    }

    /// Highlighting defaults, if a highlighter is configured.
    #[must_use]
    pub fn highlight_config(&self) -> Option<&HighlightConfig> {
        self.highlighting.as_ref().map(|h| &h.config)
    }

    /// Render a block body with its parsed options.
    #[must_use]
    pub fn render(&self, code: &str, options: &FenceOptions) -> String {
        match &self.highlighting {
            Some(highlighting) => {
                let request = build_request(code, options, &highlighting.config);
                highlighting.highlighter.highlight(&request)
            }
            None => wrap_plain(code, options.lang()),
        }
    }
}

/// Resolve every option against the defaults; fence-line values win.
fn build_request<'a>(
    code: &'a str,
    options: &'a FenceOptions,
    config: &'a HighlightConfig,
) -> HighlightRequest<'a> {
    HighlightRequest {
        code,
        linenums: options.flag(LINENUMS).or(config.linenums),
        guess_lang: options.flag(GUESS_LANG).unwrap_or(config.guess_lang),
        css_class: options
            .text(CSS_CLASS)
            .unwrap_or(config.css_class.as_str()),
        style: options
            .text(PYGMENTS_STYLE)
            .unwrap_or(config.pygments_style.as_str()),
        lang: options.lang(),
        noclasses: options.flag(NOCLASSES).unwrap_or(config.noclasses),
        hl_lines: parse_hl_lines(options.hl_lines(), code.lines().count()),
    }
}

fn wrap_plain(code: &str, lang: Option<&str>) -> String {
    let code = escape_code(code);
    match lang {
        Some(lang) => format!(r#"<pre><code class="{lang}">{code}</code></pre>"#),
        None => format!("<pre><code>{code}</code></pre>"),
    }
}

/// Escape `&`, `<`, `>` and `"` for embedding code in HTML.
#[must_use]
pub fn escape_code(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
