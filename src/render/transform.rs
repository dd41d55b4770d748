// src/render/transform.rs
// =============================================================================
// Appends a snapshot link after every external link in rendered output.
//
//   <a href="https://example.com">Example</a>&nbsp;<a href="/archives/<fp>" ...>📦</a>
//
// `ArchiveLinks` wraps another renderer. For link close tokens it renders the
// default markup first, then looks up the matching open token to get the
// href, and only appends when that href is external. Every other token, and
// every link it can't resolve or that sits inside an image, is rendered by
// the inner renderer untouched.
//
// The snapshot may not exist yet (the archiver runs separately); the link is
// emitted anyway since both sides derive the same fingerprint.
// =============================================================================

use super::html::Render;
use super::matcher::{enclosed_by, match_open};
use super::token::{Token, TokenKind};
use crate::config::{Config, DEFAULT_ICON};
use crate::discover::is_external;
use crate::fingerprint::{fingerprint, Fingerprint, DEFAULT_ARCHIVE_PREFIX};
use html_escape::encode_double_quoted_attribute as escape;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct ArchiveLinks<R> {
    inner: R,
    prefix: String,
    icon: String,
}

impl<R: Render> ArchiveLinks<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            icon: DEFAULT_ICON.to_string(),
        }
    }

    pub fn from_config(inner: R, config: &Config) -> Self {
        Self::new(inner)
            .with_prefix(&config.archive_url_prefix)
            .with_icon(&config.icon)
    }

    // Public path the archive directory is served under
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    // Link text of the snapshot link. Inserted as-is, so it may be markup.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    // Output for the link close token at `idx`.
    pub fn render_link_close(&self, tokens: &[Token], idx: usize) -> String {
        let default = self.inner.render_token(tokens, idx);

        // A link inside image alt text is not a link in the output
        if enclosed_by(tokens, idx, TokenKind::Image) {
            return default;
        }

        let Some(open) = match_open(tokens, idx) else {
            trace!(idx, "no matching link open, default rendering");
            return default;
        };

        match open.attr("href") {
            Some(href) if is_external(href) => {
                trace!(href, "appending snapshot link");
                default + &self.snapshot_link(&fingerprint(href))
            }
            _ => default,
        }
    }

    fn snapshot_link(&self, fp: &Fingerprint) -> String {
        format!(
            "&nbsp;<a href=\"{}\" class=\"archive-link\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"Auto Snapshot\">{}</a>",
            escape(&fp.archive_path(&self.prefix)),
            self.icon
        )
    }
}

impl<R: Render> Render for ArchiveLinks<R> {
    fn render_token(&self, tokens: &[Token], idx: usize) -> String {
        match tokens.get(idx) {
            Some(token) if token.is_close_of(TokenKind::Link) => self.render_link_close(tokens, idx),
            _ => self.inner.render_token(tokens, idx),
        }
    }
}
