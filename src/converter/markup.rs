//! Markup stripping for raw pages

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script pattern is valid")
});

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^>]+>").expect("tag pattern is valid"));

/// Reduces an HTML page to its visible text
///
/// Whitespace runs collapse to a single space, `<script>` and `<style>` blocks
/// are removed with their content (case-insensitively), then every remaining
/// tag is removed. Text between tags is kept as is.
///
/// # Example
///
/// ```
/// use trawl::converter::strip_markup;
///
/// let text = strip_markup("<p>Hello,\n\n<b>world</b></p><SCRIPT>x()</SCRIPT>");
/// assert_eq!(text, "Hello, world");
/// ```
pub fn strip_markup(html: &str) -> String {
    let collapsed = WHITESPACE.replace_all(html, " ");
    let without_scripts = SCRIPT_BLOCK.replace_all(&collapsed, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    TAG.replace_all(&without_styles, "").into_owned()
}
