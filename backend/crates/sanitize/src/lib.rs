//! Markup stripping for free-text record fields.
//!
//! Clinical notes, summaries, descriptions, and lab results are accepted as
//! free text and later rendered by other clients. Before persistence every
//! such value is reduced to inert text:
//!
//! 1. `<script>` and `<style>` elements are removed together with their
//!    content.
//! 2. Every remaining tag (including comments and processing instructions)
//!    is removed, keeping the text between tags.
//! 3. Stray angle brackets that did not form a tag are escaped as `&lt;` and
//!    `&gt;`.
//!
//! The transform is idempotent: stripping an already stripped value returns
//! it unchanged.
//!
//! # Examples
//!
//! ```
//! use sanitize::strip_markup;
//!
//! let cleaned = strip_markup("<b>Take</b> twice daily<script>alert(1)</script>");
//! assert_eq!(cleaned, "Take twice daily");
//! ```

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn block_regex() -> &'static Regex {
    BLOCK_RE.get_or_init(|| {
        let pattern = r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("block element regex failed to compile: {error}"))
    })
}

fn tag_regex() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new(r"(?s)<[A-Za-z/!?][^<>]*>")
            .unwrap_or_else(|error| panic!("tag regex failed to compile: {error}"))
    })
}

/// Remove active markup from `input`, returning inert text.
///
/// # Examples
///
/// ```
/// use sanitize::strip_markup;
///
/// assert_eq!(strip_markup("2 < 3"), "2 &lt; 3");
/// assert_eq!(strip_markup("<i>plain</i>"), "plain");
/// ```
#[must_use]
pub fn strip_markup(input: &str) -> String {
    let without_blocks = block_regex().replace_all(input, "");
    let without_tags = tag_regex().replace_all(&without_blocks, "");
    escape_brackets(&without_tags).into_owned()
}

/// Report whether [`strip_markup`] would alter `input`.
///
/// # Examples
///
/// ```
/// use sanitize::needs_stripping;
///
/// assert!(needs_stripping("<p>hi</p>"));
/// assert!(!needs_stripping("hi"));
/// ```
#[must_use]
pub fn needs_stripping(input: &str) -> bool {
    strip_markup(input) != input
}

fn escape_brackets(input: &str) -> Cow<'_, str> {
    if !input.contains(['<', '>']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
