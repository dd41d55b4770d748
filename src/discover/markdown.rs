// src/discover/markdown.rs
// =============================================================================
// Extracts external link targets from raw Markdown text.
//
// This deliberately does NOT use a full Markdown parser. The scan is a
// permissive `[label](target)` pattern match over the raw text, so it also
// picks up links inside code blocks, HTML comments and so on. Anything that
// looks like a link to an http(s) page gets archived.
//
// Malformed text is never an error: it simply doesn't match.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

// `[anything](target)` on a single line, shortest match for both parts
const LINK_PATTERN: &str = r"\[.*?\]\((.*?)\)";

fn link_regex() -> &'static Regex {
    static LINK_RE: OnceLock<Regex> = OnceLock::new();
    LINK_RE.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern is a valid regex"))
}

// Returns the external targets of one document, in order of appearance.
// Duplicates are kept; the caller decides whether to collapse them.
//
// Example input:
//   "See [Rust]( https://www.rust-lang.org ) and [docs](/guide)"
//
// Example output:
//   vec!["https://www.rust-lang.org"]
pub fn extract_links(markdown: &str) -> Vec<String> {
    link_regex()
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|target| target.as_str().trim())
        .filter(|target| is_external(target))
        .map(str::to_string)
        .collect()
}

// Purely syntactic check: http:// or https:// prefix, nothing else.
// mailto:, tel:, relative paths and anchors are all "internal".
pub fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}
