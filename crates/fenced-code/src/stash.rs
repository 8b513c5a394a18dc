//! Opaque-content store for rendered fragments.
//!
//! Rendered HTML is kept out of the document while later steps run; the
//! document only carries placeholder tokens, which [`HtmlStash::expand`]
//! swaps back for the stored fragments at the end.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Start-of-text marker opening every placeholder.
pub const STX: char = '\u{2}';
/// End-of-text marker closing every placeholder.
pub const ETX: char = '\u{3}';

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x02wzxhzdk:(\d+)\x03").unwrap());

/// Build the placeholder token for the fragment at `index`.
#[must_use]
pub fn placeholder(index: usize) -> String {
    format!("{STX}wzxhzdk:{index}{ETX}")
}

/// Store for finished HTML fragments.
///
/// Implementations return a token that is unique per stored fragment and
/// survives later text processing untouched.
pub trait ContentStore {
    /// Store a fragment and return its placeholder token.
    ///
    /// `safe` marks fragments that must not be escaped again.
    fn store(&mut self, fragment: String, safe: bool) -> String;
}

/// A fragment held by [`HtmlStash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashedFragment {
    /// HTML content.
    pub html: String,
    /// Whether the content is already safe HTML.
    pub safe: bool,
}

/// In-memory [`ContentStore`] with placeholder expansion.
///
/// # Example
///
/// ```
/// use fenced_code::{ContentStore, HtmlStash};
///
/// let mut stash = HtmlStash::new();
/// let token = stash.store("<b>hi</b>".to_owned(), true);
/// assert_eq!(stash.lookup(&token), Some("<b>hi</b>"));
/// assert_eq!(stash.expand(&format!("say {token}")), "say <b>hi</b>");
/// ```
#[derive(Debug, Default)]
pub struct HtmlStash {
    fragments: Vec<StashedFragment>,
}

impl HtmlStash {
    /// Create an empty stash.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a fragment by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StashedFragment> {
        self.fragments.get(index)
    }

    /// Resolve a placeholder token to its HTML.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let caps = PLACEHOLDER_RE.captures(token)?;
        if caps.get(0)?.as_str().len() != token.len() {
            return None;
        }
        let index = caps[1].parse::<usize>().ok()?;
        self.get(index).map(|fragment| fragment.html.as_str())
    }

    /// Replace every placeholder in `text` with its stored HTML.
    ///
    /// Placeholders with unknown indices are left as-is.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.get(index))
                    .map_or_else(|| caps[0].to_owned(), |fragment| fragment.html.clone())
            })
            .into_owned()
    }

    /// Number of stored fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Drop all fragments, e.g. before converting another document.
    pub fn reset(&mut self) {
        self.fragments.clear();
    }

    /// Iterate over stored fragments in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &StashedFragment> {
        self.fragments.iter()
    }
}

impl ContentStore for HtmlStash {
    fn store(&mut self, fragment: String, safe: bool) -> String {
        let index = self.fragments.len();
        self.fragments.push(StashedFragment {
            html: fragment,
            safe,
        });
        placeholder(index)
    }
}
