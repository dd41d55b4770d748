// src/render/html.rs
// =============================================================================
// Token-by-token HTML rendering.
//
// `Render` is the rule a renderer applies to one token in context. Wrapping
// renderers (see transform.rs) take another `Render` and add to its output,
// so the default markup is always produced by whatever was injected.
// =============================================================================

use super::matcher::{enclosed_by, match_close_kind};
use super::token::{Nesting, Token, TokenKind};
use html_escape::encode_double_quoted_attribute as escape;

pub trait Render {
    // Markup for `tokens[idx]`. The whole stream is passed so a rule can look
    // at neighbouring tokens.
    fn render_token(&self, tokens: &[Token], idx: usize) -> String;

    fn render(&self, tokens: &[Token]) -> String {
        (0..tokens.len())
            .map(|idx| self.render_token(tokens, idx))
            .collect()
    }
}

// Any closure with the right shape is a renderer
impl<F> Render for F
where
    F: Fn(&[Token], usize) -> String,
{
    fn render_token(&self, tokens: &[Token], idx: usize) -> String {
        self(tokens, idx)
    }
}

/// Plain CommonMark-style HTML output
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Render for HtmlRenderer {
    fn render_token(&self, tokens: &[Token], idx: usize) -> String {
        // Everything inside an image already went into its alt attribute
        if enclosed_by(tokens, idx, TokenKind::Image) {
            return String::new();
        }

        match tokens.get(idx) {
            Some(token) if token.is_open_of(TokenKind::Image) => image_tag(tokens, idx, token),
            Some(token) => match token.nesting {
                Nesting::Open => open_tag(token),
                Nesting::Close => close_tag(token.kind),
                Nesting::Leaf => leaf(token),
            },
            None => String::new(),
        }
    }
}

fn open_tag(token: &Token) -> String {
    match token.kind {
        TokenKind::Paragraph => "<p>".to_string(),
        TokenKind::Heading(level) => format!("<h{}>", level),
        TokenKind::BlockQuote => "<blockquote>\n".to_string(),
        TokenKind::CodeBlock => match token.attr("lang") {
            Some(lang) => format!("<pre><code class=\"language-{}\">", escape(lang)),
            None => "<pre><code>".to_string(),
        },
        TokenKind::OrderedList => match token.attr("start") {
            Some(start) => format!("<ol start=\"{}\">\n", escape(start)),
            None => "<ol>\n".to_string(),
        },
        TokenKind::BulletList => "<ul>\n".to_string(),
        TokenKind::Item => "<li>".to_string(),
        TokenKind::Emphasis => "<em>".to_string(),
        TokenKind::Strong => "<strong>".to_string(),
        TokenKind::Strikethrough => "<del>".to_string(),
        TokenKind::Link => {
            let mut tag = format!("<a href=\"{}\"", escape(token.attr("href").unwrap_or("")));
            if let Some(title) = token.attr("title") {
                tag.push_str(&format!(" title=\"{}\"", escape(title)));
            }
            tag.push('>');
            tag
        }
        _ => String::new(),
    }
}

// The whole <img> element. The alt attribute is the plain text of every
// token up to the matching close (or the end of an unbalanced stream), with
// nested markup such as emphasis or links dropped.
fn image_tag(tokens: &[Token], idx: usize, token: &Token) -> String {
    let end = match_close_kind(tokens, idx, TokenKind::Image).unwrap_or(tokens.len());
    let alt: String = tokens
        .get(idx + 1..end)
        .unwrap_or_default()
        .iter()
        .map(plain_text)
        .collect();

    let mut tag = format!("<img src=\"{}\"", escape(token.attr("src").unwrap_or("")));
    if let Some(title) = token.attr("title") {
        tag.push_str(&format!(" title=\"{}\"", escape(title)));
    }
    tag.push_str(&format!(" alt=\"{}\" />", escape(&alt)));
    tag
}

fn plain_text(token: &Token) -> &str {
    match token.kind {
        TokenKind::Text | TokenKind::Code => &token.content,
        TokenKind::SoftBreak | TokenKind::HardBreak => " ",
        _ => "",
    }
}

fn close_tag(kind: TokenKind) -> String {
    match kind {
        TokenKind::Paragraph => "</p>\n".to_string(),
        TokenKind::Heading(level) => format!("</h{}>\n", level),
        TokenKind::BlockQuote => "</blockquote>\n".to_string(),
        TokenKind::CodeBlock => "</code></pre>\n".to_string(),
        TokenKind::OrderedList => "</ol>\n".to_string(),
        TokenKind::BulletList => "</ul>\n".to_string(),
        TokenKind::Item => "</li>\n".to_string(),
        TokenKind::Emphasis => "</em>".to_string(),
        TokenKind::Strong => "</strong>".to_string(),
        TokenKind::Strikethrough => "</del>".to_string(),
        TokenKind::Link => "</a>".to_string(),
        _ => String::new(),
    }
}

fn leaf(token: &Token) -> String {
    match token.kind {
        TokenKind::Text => escape(&token.content).into_owned(),
        TokenKind::Code => format!("<code>{}</code>", escape(&token.content)),
        TokenKind::Html => token.content.clone(),
        TokenKind::SoftBreak => "\n".to_string(),
        TokenKind::HardBreak => "<br />\n".to_string(),
        TokenKind::Rule => "<hr />\n".to_string(),
        _ => String::new(),
    }
}
