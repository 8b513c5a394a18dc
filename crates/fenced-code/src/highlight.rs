//! Syntax highlighting collaborator contract.
//!
//! The preprocessor hands each block to a [`Highlighter`] when one is
//! configured. Per-block options come from the fence line and fall back to
//! the defaults in [`HighlightConfig`].

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::render::escape_code;

/// Default CSS class for the highlighted block wrapper.
pub const DEFAULT_CSS_CLASS: &str = "codehilite";
/// Default highlighting style name.
pub const DEFAULT_STYLE: &str = "default";

/// Inline style used for highlighted lines when classes are disabled.
const HLL_INLINE_STYLE: &str = "background-color: #ffffcc";

/// Caller-level defaults for the highlighting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    /// Line numbering (`None` lets the highlighter decide).
    pub linenums: Option<bool>,
    /// Guess the language when none is given.
    pub guess_lang: bool,
    /// CSS class of the wrapper element.
    pub css_class: String,
    /// Highlighting style name.
    pub pygments_style: String,
    /// Use inline styles instead of CSS classes.
    pub noclasses: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            linenums: None,
            guess_lang: true,
            css_class: DEFAULT_CSS_CLASS.to_owned(),
            pygments_style: DEFAULT_STYLE.to_owned(),
            noclasses: false,
        }
    }
}

impl HighlightConfig {
    /// Option names with a short description of each default.
    #[must_use]
    pub fn describe() -> [(&'static str, &'static str); 5] {
        [
            (
                "linenums",
                "Use lines numbers. True=yes, False=no, None=auto",
            ),
            ("guess_lang", "Automatic language detection"),
            ("css_class", "Set class name for wrapper <div>"),
            ("pygments_style", "Highlighting style to use"),
            ("noclasses", "Use inline styles instead of CSS classes"),
        ]
    }
}

/// Everything a highlighter needs to render one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRequest<'a> {
    /// Block body.
    pub code: &'a str,
    /// Line numbering.
    pub linenums: Option<bool>,
    /// Guess the language when `lang` is absent.
    pub guess_lang: bool,
    /// Wrapper CSS class.
    pub css_class: &'a str,
    /// Style name.
    pub style: &'a str,
    /// Block language.
    pub lang: Option<&'a str>,
    /// Use inline styles instead of classes.
    pub noclasses: bool,
    /// 1-based line numbers to emphasize.
    pub hl_lines: BTreeSet<usize>,
}

/// Syntax highlighting service.
///
/// Returns an HTML fragment that is stored as-is; implementations are
/// responsible for escaping the code.
pub trait Highlighter {
    /// Render a block to HTML.
    fn highlight(&self, request: &HighlightRequest<'_>) -> String;
}

/// Parse an `hl_lines` value into a set of line numbers.
///
/// Accepts whitespace-separated positive integers and inclusive `a-b`
/// ranges. Lines past `line_count` are dropped and ranges are clamped to it.
/// Malformed tokens are ignored.
///
/// # Example
///
/// ```
/// use fenced_code::parse_hl_lines;
///
/// let lines = parse_hl_lines(Some("1 3-5 x 8 12"), 10);
/// assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
/// ```
#[must_use]
pub fn parse_hl_lines(value: Option<&str>, line_count: usize) -> BTreeSet<usize> {
    let mut lines = BTreeSet::new();

    for token in value.unwrap_or_default().split_whitespace() {
        if let Some((from, to)) = token.split_once('-') {
            match (from.parse::<usize>(), to.parse::<usize>()) {
                (Ok(from), Ok(to)) if from > 0 && from <= to => {
                    lines.extend(from..=to.min(line_count));
                }
                _ => tracing::debug!(token, "Ignoring malformed hl_lines range"),
            }
        } else {
            match token.parse::<usize>() {
                Ok(line) if line > 0 => {
                    if line <= line_count {
                        lines.insert(line);
                    }
                }
                _ => tracing::debug!(token, "Ignoring malformed hl_lines entry"),
            }
        }
    }

    lines
}

/// Class-based highlighter without a lexer.
///
/// Emits markup for client-side highlighters: the language goes into a
/// `language-*` class, requested lines are wrapped in `<span class="hll">`
/// (or an inline style with `noclasses`). `guess_lang` and `style` have no
/// effect here.
///
/// # Example
///
/// ```
/// use fenced_code::{CodeHilite, HighlightRequest, Highlighter};
///
/// let request = HighlightRequest {
///     code: "a < b\n",
///     linenums: None,
///     guess_lang: true,
///     css_class: "codehilite",
///     style: "default",
///     lang: Some("rust"),
///     noclasses: false,
///     hl_lines: Default::default(),
/// };
/// let html = CodeHilite.highlight(&request);
/// assert_eq!(
///     html,
///     r#"<div class="codehilite"><pre><code class="language-rust">a &lt; b
/// </code></pre></div>"#
/// );
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeHilite;

impl Highlighter for CodeHilite {
    fn highlight(&self, request: &HighlightRequest<'_>) -> String {
        let mut classes = Vec::new();
        if let Some(lang) = request.lang {
            classes.push(format!("language-{lang}"));
        }
        if request.linenums == Some(true) {
            classes.push("linenums".to_owned());
        }

        let mut out = String::with_capacity(request.code.len() + 64);
        write!(out, r#"<div class="{}"><pre><code"#, escape_code(request.css_class)).unwrap();
        if !classes.is_empty() {
            write!(out, r#" class="{}""#, escape_code(&classes.join(" "))).unwrap();
        }
        out.push('>');

        for (idx, line) in request.code.split_inclusive('\n').enumerate() {
            if request.hl_lines.contains(&(idx + 1)) {
                let (text, newline) = match line.strip_suffix('\n') {
                    Some(text) => (text, "\n"),
                    None => (line, ""),
                };
                if request.noclasses {
                    write!(out, r#"<span style="{HLL_INLINE_STYLE}">"#).unwrap();
                } else {
                    out.push_str(r#"<span class="hll">"#);
                }
                out.push_str(&escape_code(text));
                out.push_str("</span>");
                out.push_str(newline);
            } else {
                out.push_str(&escape_code(line));
            }
        }

        out.push_str("</code></pre></div>");
        out
    }
}
