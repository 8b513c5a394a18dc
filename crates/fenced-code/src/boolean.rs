//! Boolean-string parsing for tri-state fence options.

/// Parse a boolean option value.
///
/// Accepts the usual spellings case-insensitively. Returns `None` for
/// anything else so callers can treat the option as unset.
///
/// # Examples
///
/// ```
/// use fenced_code::parse_bool;
///
/// assert_eq!(parse_bool("True"), Some(true));
/// assert_eq!(parse_bool("off"), Some(false));
/// assert_eq!(parse_bool("maybe"), None);
/// ```
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" | "none" | "" => Some(false),
        _ => None,
    }
}
