//! Markdown tokenizer: adapts the pulldown-cmark event stream to [`Token`]s.
//!
//! Only headings, paragraphs and their inline text/strong/emphasis events are
//! kept. Everything else (lists, code blocks, rules, ...) is parsed but
//! dropped from the stream.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use tracing::{instrument, trace};

use crate::domain::token::{Nesting, Token};

/// Tokenize `source` into a flat token stream.
#[instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn tokenize(source: &str) -> Vec<Token> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut block: Option<OpenBlock> = None;

    for (event, range) in Parser::new_ext(source, Options::empty()).into_offset_iter() {
        let line = lines.line_of(range.start);
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                tokens.push(Token::heading_open(heading_depth(level), line));
                block = Some(OpenBlock::new(line));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some(open) = block.take() {
                    tokens.push(open.finish(source));
                }
                tokens.push(Token::heading_close(heading_depth(level), line));
            }
            Event::Start(Tag::Paragraph) => {
                tokens.push(Token::paragraph_open(line));
                block = Some(OpenBlock::new(line));
            }
            Event::End(TagEnd::Paragraph) => {
                if let Some(open) = block.take() {
                    tokens.push(open.finish(source));
                }
                tokens.push(Token::paragraph_close(line));
            }
            Event::Start(Tag::Strong) => {
                push_segment(&mut block, Token::strong(Nesting::Open, line), range)
            }
            Event::End(TagEnd::Strong) => {
                push_segment(&mut block, Token::strong(Nesting::Close, line), range)
            }
            Event::Start(Tag::Emphasis) => {
                push_segment(&mut block, Token::em(Nesting::Open, line), range)
            }
            Event::End(TagEnd::Emphasis) => {
                push_segment(&mut block, Token::em(Nesting::Close, line), range)
            }
            Event::Text(text) | Event::InlineHtml(text) => {
                push_segment(&mut block, Token::text(text.to_string(), line), range)
            }
            Event::Code(code) => {
                push_segment(&mut block, Token::text(format!("`{code}`"), line), range)
            }
            Event::SoftBreak | Event::HardBreak => {
                push_segment(&mut block, Token::text("\n", line), range)
            }
            // no token of their own, but the raw content keeps the link syntax
            Event::Start(Tag::Link { .. } | Tag::Image { .. })
            | Event::End(TagEnd::Link | TagEnd::Image) => {
                if let Some(open) = block.as_mut() {
                    open.cover(range);
                }
            }
            other => trace!(?other, "skipping event"),
        }
    }

    tokens
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn push_segment(block: &mut Option<OpenBlock>, token: Token, range: Range<usize>) {
    // inline events outside a heading or paragraph (tight list items, tables) carry no structure
    if let Some(open) = block.as_mut() {
        open.push(token, range);
    }
}

/// Heading or paragraph whose inline content is being collected.
struct OpenBlock {
    line: usize,
    span: Option<Range<usize>>,
    children: Vec<Token>,
}

impl OpenBlock {
    fn new(line: usize) -> Self {
        Self {
            line,
            span: None,
            children: Vec::new(),
        }
    }

    fn push(&mut self, token: Token, range: Range<usize>) {
        self.cover(range);
        self.children.push(token);
    }

    /// Widen the raw span to include `range`.
    fn cover(&mut self, range: Range<usize>) {
        self.span = Some(match self.span.take() {
            Some(span) => span.start.min(range.start)..span.end.max(range.end),
            None => range,
        });
    }

    /// Close the block; content is the raw source covered by its inline events.
    fn finish(self, source: &str) -> Token {
        let content = self
            .span
            .and_then(|span| source.get(span))
            .map(str::trim)
            .unwrap_or_default();
        Token::inline(content, self.children, self.line)
    }
}

/// Maps byte offsets to 1-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::TokenKind;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn given_heading_and_block_when_tokenizing_then_emits_open_inline_close_pairs() {
        let tokens = tokenize("## Sheet1\n{\"a\":1}\n");

        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::HeadingOpen,
                TokenKind::Inline,
                TokenKind::HeadingClose,
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose,
            ]
        );
        assert_eq!(tokens[0].markup, "##");
        assert_eq!(tokens[1].content, "Sheet1");
        assert_eq!(tokens[4].content, "{\"a\":1}");
        assert_eq!(tokens[4].line, 2);
    }

    #[test]
    fn given_emphasis_in_block_when_tokenizing_then_content_stays_raw() {
        let tokens = tokenize("# A\n{\"v\":\"*x* and \\\\ y\"}\n");

        let inline = &tokens[4];
        assert_eq!(inline.content, "{\"v\":\"*x* and \\\\ y\"}");
        assert!(inline.children.iter().any(|t| t.kind == TokenKind::EmOpen));
    }

    #[test]
    fn given_setext_heading_when_tokenizing_then_depth_follows_level() {
        let tokens = tokenize("Title\n=====\n\nSub\n---\n");

        assert_eq!(tokens[0].depth(), 1);
        assert_eq!(tokens[1].content, "Title");
        assert_eq!(tokens[3].depth(), 2);
        assert_eq!(tokens[4].content, "Sub");
    }

    #[test]
    fn given_list_and_code_block_when_tokenizing_then_they_are_dropped() {
        let tokens = tokenize("- item\n- other\n\n```\ncode\n```\n");
        assert!(tokens.is_empty());
    }

    #[test]
    fn given_link_heading_when_tokenizing_then_content_keeps_link_syntax() {
        let tokens = tokenize("# [Sheet](http://x)\n## See ![chart](c.png) here\n");

        assert_eq!(tokens[1].content, "[Sheet](http://x)");
        assert_eq!(tokens[4].content, "See ![chart](c.png) here");
    }

    #[test]
    fn given_offsets_when_mapping_lines_then_counts_from_one() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(3), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_of(6), 4);
    }
}
