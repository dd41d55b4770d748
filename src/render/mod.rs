// src/render/mod.rs
// =============================================================================
// Rendering pipeline: Markdown -> token stream -> HTML with snapshot links.
//
// Submodules:
// - token: the flat token stream and the pulldown-cmark adapter
// - matcher: pairs a close token with its open token
// - html: the Render trait and the default HTML renderer
// - transform: ArchiveLinks, which decorates external links
// =============================================================================

mod html;
mod matcher;
mod token;
mod transform;

pub use html::{HtmlRenderer, Render};
pub use matcher::{enclosed_by, match_close_kind, match_open, match_open_kind};
pub use token::{tokens_from_markdown, Nesting, Token, TokenKind};
pub use transform::ArchiveLinks;

// Markdown straight to HTML, with snapshot links after external links
pub fn render_markdown(markdown: &str, archive_links: &ArchiveLinks<HtmlRenderer>) -> String {
    archive_links.render(&tokens_from_markdown(markdown))
}
