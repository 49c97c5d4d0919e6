//! Inline formatting encoder.
//!
//! Renders a run of inline segments (text, strong, emphasis) back into
//! markdown delimiters. Standalone utility: the JSON conversion never calls it.

use crate::domain::token::{Token, TokenKind};

pub const STRONG_DELIMITER: &str = "**";
pub const EM_DELIMITER: &str = "*";

/// Render `segments` as marked-up text.
///
/// Stray close tokens are ignored; a span left open is closed at the end of
/// the run. Tokens other than text/strong/emphasis contribute nothing.
pub fn render_inline(segments: &[Token]) -> String {
    let mut cursor = 0;
    render_run(segments, &mut cursor, None)
}

fn render_run(segments: &[Token], cursor: &mut usize, until: Option<TokenKind>) -> String {
    let mut out = String::new();
    while let Some(token) = segments.get(*cursor) {
        *cursor += 1;
        match token.kind {
            kind if Some(kind) == until => return out,
            TokenKind::Text => out.push_str(&token.content),
            TokenKind::StrongOpen => {
                let inner = render_run(segments, cursor, Some(TokenKind::StrongClose));
                wrap(&mut out, &inner, STRONG_DELIMITER);
            }
            TokenKind::EmOpen => {
                let inner = render_run(segments, cursor, Some(TokenKind::EmClose));
                wrap(&mut out, &inner, EM_DELIMITER);
            }
            _ => {}
        }
    }
    out
}

fn wrap(out: &mut String, inner: &str, delimiter: &str) {
    out.push_str(delimiter);
    out.push_str(inner);
    out.push_str(delimiter);
}
