//! Flat token stream consumed by the tree builder.
//!
//! Tokens mirror a markdown event stream: every heading and paragraph is an
//! open/close pair with an [`TokenKind::Inline`] token in between that carries
//! the raw source text of the block and its inline children.

use std::fmt;

/// Category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    /// Content of the enclosing heading or paragraph
    Inline,
    Text,
    StrongOpen,
    StrongClose,
    EmOpen,
    EmClose,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::HeadingOpen => "heading_open",
            TokenKind::HeadingClose => "heading_close",
            TokenKind::ParagraphOpen => "paragraph_open",
            TokenKind::ParagraphClose => "paragraph_close",
            TokenKind::Inline => "inline",
            TokenKind::Text => "text",
            TokenKind::StrongOpen => "strong_open",
            TokenKind::StrongClose => "strong_close",
            TokenKind::EmOpen => "em_open",
            TokenKind::EmClose => "em_close",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a token opens a span, closes one, or stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
    Leaf,
}

/// A single event of the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub nesting: Nesting,
    /// Literal marker; for headings its length is the depth (`###` → 3)
    pub markup: String,
    /// Tag label: `h1`..`h6`, `p`, `strong`, `em`, or empty
    pub tag: String,
    /// Raw source text for inline tokens, literal text for text tokens
    pub content: String,
    /// Inline segments of an [`TokenKind::Inline`] token
    pub children: Vec<Token>,
    /// 1-based source line where the token starts
    pub line: usize,
}

impl Token {
    fn new(kind: TokenKind, nesting: Nesting, markup: &str, tag: &str, line: usize) -> Self {
        Self {
            kind,
            nesting,
            markup: markup.to_string(),
            tag: tag.to_string(),
            content: String::new(),
            children: Vec::new(),
            line,
        }
    }

    pub fn heading_open(depth: usize, line: usize) -> Self {
        Self::new(
            TokenKind::HeadingOpen,
            Nesting::Open,
            &HEADING_MARKER.repeat(depth),
            &format!("h{depth}"),
            line,
        )
    }

    pub fn heading_close(depth: usize, line: usize) -> Self {
        Self::new(
            TokenKind::HeadingClose,
            Nesting::Close,
            &HEADING_MARKER.repeat(depth),
            &format!("h{depth}"),
            line,
        )
    }

    pub fn paragraph_open(line: usize) -> Self {
        Self::new(TokenKind::ParagraphOpen, Nesting::Open, "", "p", line)
    }

    pub fn paragraph_close(line: usize) -> Self {
        Self::new(TokenKind::ParagraphClose, Nesting::Close, "", "p", line)
    }

    pub fn inline(content: impl Into<String>, children: Vec<Token>, line: usize) -> Self {
        let mut token = Self::new(TokenKind::Inline, Nesting::Leaf, "", "", line);
        token.content = content.into();
        token.children = children;
        token
    }

    pub fn text(content: impl Into<String>, line: usize) -> Self {
        let mut token = Self::new(TokenKind::Text, Nesting::Leaf, "", "", line);
        token.content = content.into();
        token
    }

    pub fn strong(nesting: Nesting, line: usize) -> Self {
        let kind = match nesting {
            Nesting::Close => TokenKind::StrongClose,
            _ => TokenKind::StrongOpen,
        };
        Self::new(kind, nesting, "**", "strong", line)
    }

    pub fn em(nesting: Nesting, line: usize) -> Self {
        let kind = match nesting {
            Nesting::Close => TokenKind::EmClose,
            _ => TokenKind::EmOpen,
        };
        Self::new(kind, nesting, "*", "em", line)
    }

    /// Nesting depth encoded by the marker length.
    pub fn depth(&self) -> usize {
        self.markup.chars().count()
    }
}

/// Character repeated to build heading markers.
pub const HEADING_MARKER: &str = "#";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_heading_open_when_created_then_markup_length_is_depth() {
        let token = Token::heading_open(4, 7);
        assert_eq!(token.markup, "####");
        assert_eq!(token.tag, "h4");
        assert_eq!(token.depth(), 4);
        assert_eq!(token.nesting, Nesting::Open);
        assert_eq!(token.line, 7);
    }

    #[test]
    fn given_close_nesting_when_creating_strong_then_kind_is_close() {
        assert_eq!(Token::strong(Nesting::Close, 1).kind, TokenKind::StrongClose);
        assert_eq!(Token::em(Nesting::Open, 1).kind, TokenKind::EmOpen);
    }

    #[test]
    fn given_token_kind_when_displayed_then_uses_event_name() {
        assert_eq!(TokenKind::ParagraphOpen.to_string(), "paragraph_open");
    }
}
