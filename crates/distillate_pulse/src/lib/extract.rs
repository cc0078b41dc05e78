//! Boilerplate-free text extraction from article HTML.
//!
//! Deliberately modest: drop non-content blocks, strip the remaining markup
//! and collapse whitespace. Extraction failure upstream is non-fatal, so a
//! best-effort result is acceptable here.

use std::sync::LazyLock;

use regex::Regex;

static DROP_BLOCK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["script", "style", "nav", "footer", "header"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b.*?</{tag}>")).unwrap())
        .collect()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());

/// Returns the visible text of an HTML document, one non-empty line per
/// block, with scripts, styles and page chrome removed.
pub fn extract_text_from_html(html: &str) -> String {
    let mut stripped = html.to_string();
    for re in DROP_BLOCK_RES.iter() {
        stripped = re.replace_all(&stripped, " ").into_owned();
    }
    let without_tags = TAG_RE.replace_all(&stripped, "\n");
    let decoded = html_escape::decode_html_entities(&without_tags);

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
