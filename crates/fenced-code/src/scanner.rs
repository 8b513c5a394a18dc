//! Fenced block detection.
//!
//! Locates complete fenced blocks in a text buffer: an opening fence line
//! with optional attributes, a body, and a closing fence made of exactly the
//! same delimiter run.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Opening fence: 3+ backticks or tildes at line start, optional spaces,
/// attributes restricted to a safe character set, then a newline.
static OPENING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(?P<fence>~{3,}|`{3,})[ ]*(?P<options>[a-zA-Z0-9 .{}="'_+-]*)\n"#).unwrap()
});

/// A complete fenced block found in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Exact delimiter run of the opening fence (e.g. "````").
    pub fence: &'a str,
    /// Raw attribute text after the fence (possibly empty).
    pub options: &'a str,
    /// Block body; empty or ending with a newline.
    pub code: &'a str,
    /// Byte span from the opening fence to the end of the closing fence line
    /// (excluding its newline).
    pub span: Range<usize>,
}

impl FencedBlock<'_> {
    /// Byte offset of the opening fence.
    #[must_use]
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Byte offset just past the closing fence line.
    #[must_use]
    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// Finds fenced blocks in a text buffer.
///
/// # Example
///
/// ```
/// use fenced_code::FenceScanner;
///
/// let text = "intro\n~~~ .rust\nfn main() {}\n~~~\noutro";
/// let block = FenceScanner::new().find(text).unwrap();
/// assert_eq!(block.fence, "~~~");
/// assert_eq!(block.options, ".rust");
/// assert_eq!(block.code, "fn main() {}\n");
/// assert_eq!(&text[block.span], "~~~ .rust\nfn main() {}\n~~~");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FenceScanner;

impl FenceScanner {
    /// Create a new scanner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Find the first complete block in `text`.
    #[must_use]
    pub fn find<'a>(&self, text: &'a str) -> Option<FencedBlock<'a>> {
        self.find_at(text, 0)
    }

    /// Find the leftmost complete block whose opening fence starts at or
    /// after byte offset `from`.
    ///
    /// Openings without a matching closer are skipped; scanning resumes on
    /// the following line.
    #[must_use]
    pub fn find_at<'a>(&self, text: &'a str, from: usize) -> Option<FencedBlock<'a>> {
        let mut pos = from;

        while let Some(caps) = OPENING_RE.captures_at(text, pos) {
            let opening = caps.get(0)?;
            let fence = caps.name("fence")?.as_str();
            let options = caps.name("options").map_or("", |m| m.as_str());
            let body_start = opening.end();

            if let Some(closer) = find_closer(text, body_start, fence) {
                return Some(FencedBlock {
                    fence,
                    options,
                    code: &text[body_start..closer.start],
                    span: opening.start()..closer.end,
                });
            }

            tracing::trace!(offset = opening.start(), fence, "Fence has no matching closer");
            pos = body_start;
        }

        None
    }

    /// Iterate over successive non-overlapping blocks in document order.
    pub fn blocks<'s, 'a>(&'s self, text: &'a str) -> Blocks<'s, 'a> {
        Blocks {
            scanner: self,
            text,
            pos: 0,
        }
    }
}

/// Iterator over fenced blocks, see [`FenceScanner::blocks`].
#[derive(Debug)]
pub struct Blocks<'s, 'a> {
    scanner: &'s FenceScanner,
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Blocks<'_, 'a> {
    type Item = FencedBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.scanner.find_at(self.text, self.pos)?;
        self.pos = block.end();
        Some(block)
    }
}

/// Find the first closing fence line at or after `from` (a line start).
///
/// Returns the span of the closing line without its newline.
fn find_closer(text: &str, from: usize, fence: &str) -> Option<Range<usize>> {
    let mut line_start = from;

    while line_start <= text.len() {
        let rest = &text[line_start..];
        let line_len = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_len];

        if is_closing_line(line, fence) {
            return Some(line_start..line_start + line_len);
        }

        if line_len == rest.len() {
            return None;
        }
        line_start += line_len + 1;
    }

    None
}

/// Check if a line is exactly the fence run followed by optional spaces.
fn is_closing_line(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .is_some_and(|rest| rest.bytes().all(|b| b == b' '))
}
