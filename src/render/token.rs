// src/render/token.rs
// =============================================================================
// Flat markup token stream.
//
// Every structural element shows up as an Open token and a later Close token
// of the same kind; text and other atoms are Leaf tokens. Nothing links an
// Open to its Close, so anything that needs the pair (see matcher.rs) has to
// work it out from the order of the stream.
//
// `tokens_from_markdown` builds such a stream from pulldown-cmark events.
// =============================================================================

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock,
    OrderedList,
    BulletList,
    Item,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    Text,
    Code,
    Html,
    SoftBreak,
    HardBreak,
    Rule,
    /// Anything the renderer has no markup for (tables, footnotes, ...)
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub nesting: Nesting,
    /// Attribute bag, e.g. ("href", "https://...") on link open tokens
    pub attrs: Vec<(String, String)>,
    /// Text payload of leaf tokens
    pub content: String,
}

impl Token {
    pub fn open(kind: TokenKind) -> Self {
        Self::new(kind, Nesting::Open, String::new())
    }

    pub fn close(kind: TokenKind) -> Self {
        Self::new(kind, Nesting::Close, String::new())
    }

    pub fn leaf(kind: TokenKind, content: impl Into<String>) -> Self {
        Self::new(kind, Nesting::Leaf, content.into())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::leaf(TokenKind::Text, content)
    }

    // Shorthand for an opening link token carrying its target
    pub fn link_open(href: impl Into<String>) -> Self {
        Self::open(TokenKind::Link).with_attr("href", href)
    }

    fn new(kind: TokenKind, nesting: Nesting, content: String) -> Self {
        Self {
            kind,
            nesting,
            attrs: Vec::new(),
            content,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    // First value of attribute `name`, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_open_of(&self, kind: TokenKind) -> bool {
        self.nesting == Nesting::Open && self.kind == kind
    }

    pub fn is_close_of(&self, kind: TokenKind) -> bool {
        self.nesting == Nesting::Close && self.kind == kind
    }
}

// Parses Markdown into the flat token stream used by the renderers.
pub fn tokens_from_markdown(markdown: &str) -> Vec<Token> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    Parser::new_ext(markdown, options).map(event_to_token).collect()
}

fn event_to_token(event: Event) -> Token {
    match event {
        Event::Start(tag) => open_token(tag),
        Event::End(tag) => Token::close(tag_kind(&tag)),
        Event::Text(text) => Token::text(text.to_string()),
        Event::Code(code) => Token::leaf(TokenKind::Code, code.to_string()),
        Event::Html(html) => Token::leaf(TokenKind::Html, html.to_string()),
        Event::SoftBreak => Token::leaf(TokenKind::SoftBreak, ""),
        Event::HardBreak => Token::leaf(TokenKind::HardBreak, ""),
        Event::Rule => Token::leaf(TokenKind::Rule, ""),
        _ => Token::leaf(TokenKind::Other, ""),
    }
}

fn open_token(tag: Tag) -> Token {
    let token = Token::open(tag_kind(&tag));

    match tag {
        Tag::Link(_, dest, title) | Tag::Image(_, dest, title) => {
            let name = if token.kind == TokenKind::Link { "href" } else { "src" };
            let token = token.with_attr(name, dest.to_string());
            if title.is_empty() {
                token
            } else {
                token.with_attr("title", title.to_string())
            }
        }
        Tag::CodeBlock(CodeBlockKind::Fenced(lang)) if !lang.is_empty() => {
            token.with_attr("lang", lang.to_string())
        }
        Tag::List(Some(start)) if start != 1 => token.with_attr("start", start.to_string()),
        _ => token,
    }
}

fn tag_kind(tag: &Tag) -> TokenKind {
    match tag {
        Tag::Paragraph => TokenKind::Paragraph,
        Tag::Heading(level, _, _) => TokenKind::Heading(*level as u8),
        Tag::BlockQuote => TokenKind::BlockQuote,
        Tag::CodeBlock(_) => TokenKind::CodeBlock,
        Tag::List(Some(_)) => TokenKind::OrderedList,
        Tag::List(None) => TokenKind::BulletList,
        Tag::Item => TokenKind::Item,
        Tag::Emphasis => TokenKind::Emphasis,
        Tag::Strong => TokenKind::Strong,
        Tag::Strikethrough => TokenKind::Strikethrough,
        Tag::Link(..) => TokenKind::Link,
        Tag::Image(..) => TokenKind::Image,
        _ => TokenKind::Other,
    }
}
