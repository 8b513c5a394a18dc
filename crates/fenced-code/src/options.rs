//! Fence option parsing.
//!
//! Parses the attribute string that follows an opening fence:
//!
//! ~~~text
//! ```python
//! ```.python
//! ```{.python hl_lines="1 3" linenums="true"}
//! ~~~
//!
//! A bare label is the language; `key="value"` (or `key='value'`) pairs set
//! named options. Boolean-typed keys are parsed into tri-state flags, every
//! other key keeps its raw text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::boolean::parse_bool;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z0-9_+-]+").unwrap());

/// Option key holding the block language.
pub const LANG: &str = "lang";
/// Option key holding the highlighted line list.
pub const HL_LINES: &str = "hl_lines";
/// Option key for line numbering.
pub const LINENUMS: &str = "linenums";
/// Option key for language guessing.
pub const GUESS_LANG: &str = "guess_lang";
/// Option key for the wrapper CSS class.
pub const CSS_CLASS: &str = "css_class";
/// Option key for the highlighting style name.
pub const PYGMENTS_STYLE: &str = "pygments_style";
/// Option key for inline styles instead of classes.
pub const NOCLASSES: &str = "noclasses";

/// Typed value of a single fence option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Raw string value (language, CSS class, unknown keys, ...).
    Text(String),
    /// Explicit boolean value for a boolean-typed key.
    Flag(bool),
}

impl OptionValue {
    /// Borrow the text value, if this is a text option.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Get the boolean value, if this is a flag option.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }
}

/// How a recognized key's raw value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKind {
    Text,
    Flag,
}

fn option_kind(key: &str) -> OptionKind {
    match key {
        LINENUMS | GUESS_LANG | NOCLASSES => OptionKind::Flag,
        _ => OptionKind::Text,
    }
}

/// Parsed options from a fence's opening line.
///
/// # Example
///
/// ```
/// use fenced_code::FenceOptions;
///
/// let options = FenceOptions::parse(r#"{.python hl_lines="1 3" linenums="true"}"#);
/// assert_eq!(options.lang(), Some("python"));
/// assert_eq!(options.hl_lines(), Some("1 3"));
/// assert_eq!(options.flag("linenums"), Some(true));
/// assert_eq!(options.flag("noclasses"), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FenceOptions {
    entries: HashMap<String, OptionValue>,
}

impl FenceOptions {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an attribute string into an option set.
    ///
    /// Never fails: malformed pairs are dropped and scanning continues.
    #[must_use]
    pub fn parse(attrs: &str) -> Self {
        let mut options = Self::new();
        let mut remaining = truncate_dot(truncate_braces(attrs.trim()));

        while let Some(m) = LABEL_RE.find(remaining) {
            let label = m.as_str();
            remaining = remaining[m.end()..].trim_start();

            let Some((quote, after_quote)) = split_quote_start(remaining) else {
                options.insert(LANG, OptionValue::Text(label.to_owned()));
                continue;
            };

            let Some(end_quote) = after_quote.find(quote) else {
                // An unterminated value ends at the next whitespace.
                tracing::debug!(key = label, "Dropping fence option with unterminated quote");
                let skip = after_quote
                    .find(char::is_whitespace)
                    .unwrap_or(after_quote.len());
                remaining = after_quote[skip..].trim_start();
                continue;
            };

            let raw = &after_quote[..end_quote];
            remaining = after_quote[end_quote + 1..].trim_start();

            match option_kind(label) {
                OptionKind::Text => options.insert(label, OptionValue::Text(raw.to_owned())),
                OptionKind::Flag => {
                    if let Some(flag) = parse_bool(raw) {
                        options.insert(label, OptionValue::Flag(flag));
                    } else {
                        tracing::debug!(key = label, value = raw, "Dropping invalid boolean fence option");
                    }
                }
            }
        }

        options
    }

    /// Set an option, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.entries.insert(key.into(), value);
    }

    /// Get an option value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    /// Get a text option by key.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_text)
    }

    /// Get a tri-state flag by key (`None` when unset).
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(OptionValue::as_flag)
    }

    /// Block language, if any.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.text(LANG)
    }

    /// Raw `hl_lines` value, if any.
    #[must_use]
    pub fn hl_lines(&self) -> Option<&str> {
        self.text(HL_LINES)
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no options were set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all options in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Strip one pair of braces wrapping the whole string.
fn truncate_braces(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('{') && s.ends_with('}') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Strip a single leading dot (`.python` class syntax).
fn truncate_dot(s: &str) -> &str {
    s.strip_prefix('.').unwrap_or(s)
}

/// Split `="value...` into the quote character and the text after it.
fn split_quote_start(s: &str) -> Option<(char, &str)> {
    let rest = s.strip_prefix('=')?;
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    Some((quote, &rest[1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> OptionValue {
        OptionValue::Text(value.to_owned())
    }

    #[test]
    fn test_empty() {
        assert!(FenceOptions::parse("").is_empty());
        assert!(FenceOptions::parse("   ").is_empty());
        assert!(FenceOptions::parse("{}").is_empty());
    }

    #[test]
    fn test_bare_label() {
        let options = FenceOptions::parse("python");
        assert_eq!(options.lang(), Some("python"));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_dot_label() {
        let options = FenceOptions::parse(".python");
        assert_eq!(options.lang(), Some("python"));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_braces_with_dot_and_pair() {
        let options = FenceOptions::parse(r#"{.python hl_lines="1 3"}"#);
        assert_eq!(options.lang(), Some("python"));
        assert_eq!(options.hl_lines(), Some("1 3"));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_boolean_option() {
        let options = FenceOptions::parse(r#"highlight linenums="True""#);
        assert_eq!(options.lang(), Some("highlight"));
        assert_eq!(options.get(LINENUMS), Some(&OptionValue::Flag(true)));
    }

    #[test]
    fn test_unterminated_quote_is_dropped() {
        let options = FenceOptions::parse(r#"foo="unterminated"#);
        assert!(options.is_empty());
    }

    #[test]
    fn test_unterminated_quote_keeps_earlier_options() {
        let options = FenceOptions::parse(r#"rust css_class="x" foo="oops"#);
        assert_eq!(options.lang(), Some("rust"));
        assert_eq!(options.text(CSS_CLASS), Some("x"));
        assert!(!options.contains("foo"));
    }

    #[test]
    fn test_unterminated_quote_keeps_later_options() {
        let options = FenceOptions::parse(r#"rust foo='oops linenums="true""#);
        assert_eq!(options.lang(), Some("rust"));
        assert_eq!(options.flag(LINENUMS), Some(true));
        assert!(!options.contains("foo"));
    }

    #[test]
    fn test_iter_yields_every_option() {
        let options = FenceOptions::parse(r#"rust css_class="x" noclasses="on""#);
        let mut entries: Vec<_> = options.iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        assert_eq!(
            entries,
            vec![
                (CSS_CLASS, &text("x")),
                (LANG, &text("rust")),
                (NOCLASSES, &OptionValue::Flag(true)),
            ]
        );
    }

    #[test]
    fn test_single_quotes() {
        let options = FenceOptions::parse("css_class='my code'");
        assert_eq!(options.get(CSS_CLASS), Some(&text("my code")));
    }

    #[test]
    fn test_mismatched_quote_needs_same_char() {
        // A double-quoted value may contain single quotes.
        let options = FenceOptions::parse(r#"title="it's" rust"#);
        assert_eq!(options.text("title"), Some("it's"));
        assert_eq!(options.lang(), Some("rust"));
    }

    #[test]
    fn test_last_label_wins() {
        let options = FenceOptions::parse("python ruby");
        assert_eq!(options.lang(), Some("ruby"));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_unknown_key_passes_through() {
        let options = FenceOptions::parse(r#"rust title="main.rs""#);
        assert_eq!(options.text("title"), Some("main.rs"));
    }

    #[test]
    fn test_unquoted_value_is_not_a_pair() {
        // Without quotes both sides are bare labels.
        let options = FenceOptions::parse("linenums=true");
        assert_eq!(options.lang(), Some("true"));
        assert!(!options.contains(LINENUMS));
    }

    #[test]
    fn test_spaces_around_equals() {
        let options = FenceOptions::parse(r#"css_class ="wide""#);
        assert_eq!(options.text(CSS_CLASS), Some("wide"));
    }

    #[test]
    fn test_invalid_boolean_is_dropped() {
        let options = FenceOptions::parse(r#"rust noclasses="sometimes""#);
        assert_eq!(options.lang(), Some("rust"));
        assert_eq!(options.flag(NOCLASSES), None);
    }

    #[test]
    fn test_all_boolean_keys() {
        let options =
            FenceOptions::parse(r#"linenums="no" guess_lang="off" noclasses="yes""#);
        assert_eq!(options.flag(LINENUMS), Some(false));
        assert_eq!(options.flag(GUESS_LANG), Some(false));
        assert_eq!(options.flag(NOCLASSES), Some(true));
        assert_eq!(options.lang(), None);
    }

    #[test]
    fn test_label_characters() {
        let options = FenceOptions::parse("c++");
        assert_eq!(options.lang(), Some("c++"));

        let options = FenceOptions::parse("objective-c");
        assert_eq!(options.lang(), Some("objective-c"));
    }

    #[test]
    fn test_later_pair_overrides_earlier() {
        let options = FenceOptions::parse(r#"hl_lines="1" hl_lines="2 4""#);
        assert_eq!(options.hl_lines(), Some("2 4"));
    }

    #[test]
    fn test_flag_accessor_ignores_text() {
        let options = FenceOptions::parse(r#"css_class="true""#);
        assert_eq!(options.flag(CSS_CLASS), None);
        assert_eq!(options.text(CSS_CLASS), Some("true"));
    }
}
