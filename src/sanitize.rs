//! Text sanitization for raw feed content
//!
//! Feed descriptions arrive as HTML fragments. Before an item is
//! formatted into a chat message the markup is stripped, entities are
//! decoded, and overlong multi-line bodies are collapsed to a single
//! summary line.

use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Marker appended to a truncated description
const TRUNCATION_MARKER: &str = " ...\n";

/// Strip markup tags and decode HTML/XML character entities.
///
/// Malformed markup degrades gracefully: anything shaped like a tag is
/// removed, the rest passes through as plain text.
///
/// # Examples
///
/// ```
/// use ryze::sanitize::strip_markup;
///
/// let html = "<p>Patch <strong>14.1</strong> &amp; notes</p>";
/// assert_eq!(strip_markup(html), "Patch 14.1 & notes");
/// ```
pub fn strip_markup(raw: &str) -> String {
    let stripped = TAG_REGEX.replace_all(raw, "");
    html_escape::decode_html_entities(&stripped).into_owned()
}

/// Collapse a multi-line description to its first line plus a marker.
///
/// A newline in a feed description usually means a long body; only the
/// first line is worth relaying. Single-line input is returned
/// unchanged, so the function is idempotent: the marker's own trailing
/// newline ends the string and a second application changes nothing.
///
/// # Examples
///
/// ```
/// use ryze::sanitize::truncate_to_summary;
///
/// assert_eq!(truncate_to_summary("one\ntwo\nthree"), "one ...\n");
/// assert_eq!(truncate_to_summary("short"), "short");
/// ```
pub fn truncate_to_summary(s: &str) -> String {
    match s.split_once('\n') {
        None => s.to_string(),
        // Already in truncated form: single trailing newline right
        // after the marker
        Some((first, rest)) if rest.is_empty() && first.ends_with(" ...") => s.to_string(),
        Some((first, _)) => format!("{first}{TRUNCATION_MARKER}"),
    }
}
