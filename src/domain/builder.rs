//! Tree builder: turns the flat token stream into a nested document tree.
//!
//! Nesting is inferred from heading marker length alone. A stack of open
//! nodes (the [`ParseContext`]) holds the path from the root to the node
//! currently being populated:
//!
//! ```text
//! # A          stack: [A]
//! ## B         stack: [A, B]        B is a child of A
//! {"x":1}      merged into B
//! ## C         stack: [A, C]        same depth: C is a sibling of B
//! # D          stack: [D]           dedent: D attaches to the root
//! ```
//!
//! Depths along the stack strictly increase, so a single loop that pops every
//! node at least as deep as the incoming heading covers children, siblings
//! and dedents. When popping exhausts the stack the heading attaches to the
//! root of the document.

use generational_arena::Index;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::strip::strip_bookkeeping;
use crate::domain::token::{Token, TokenKind};
use crate::domain::tokenizer::tokenize;

/// Path of open heading nodes, root excluded.
#[derive(Debug, Default)]
pub struct ParseContext {
    stack: Vec<Index>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, idx: Index) {
        self.stack.push(idx);
    }

    pub fn pop(&mut self) -> Option<Index> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<Index> {
        self.stack.last().copied()
    }
}

/// Builds a [`TreeArena`] from a token stream.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: TreeArena,
    context: ParseContext,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `tokens` and return the finished tree.
    ///
    /// Fails on the first structured block that is not a JSON object or that
    /// has no enclosing heading; no partial tree is returned.
    #[instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
    pub fn build(mut self, tokens: &[Token]) -> DomainResult<TreeArena> {
        for (idx, token) in tokens.iter().enumerate() {
            let content = tokens.get(idx + 1).filter(|t| t.kind == TokenKind::Inline);
            match token.kind {
                TokenKind::HeadingOpen => {
                    let title = content.map(|t| t.content.as_str()).unwrap_or_default();
                    self.on_heading(token, title);
                }
                TokenKind::ParagraphOpen => {
                    if let Some(block) = content {
                        self.on_paragraph(block)?;
                    }
                }
                _ => {}
            }
        }
        debug!(nodes = self.tree.len(), height = self.tree.height(), "tree built");
        Ok(self.tree)
    }

    fn on_heading(&mut self, heading: &Token, title: &str) {
        let depth = heading.depth();
        let parent = self.resolve_parent(depth);

        let existing = self.tree.get_node(parent).and_then(|node| node.child(title));
        let node = match existing {
            Some(idx) => {
                trace!(title, depth, "reusing existing heading");
                idx
            }
            None => self
                .tree
                .insert_node(parent, title, &heading.tag, &heading.markup),
        };
        self.context.push(node);
    }

    /// Pop every open node at least as deep as `depth`; the remaining top
    /// (or the root) becomes the parent.
    fn resolve_parent(&mut self, depth: usize) -> Index {
        while let Some(top) = self.context.top() {
            if self.tree.depth_of(top) < depth {
                return top;
            }
            self.context.pop();
        }
        trace!(depth, "stack exhausted, attaching to root");
        self.tree.root()
    }

    fn on_paragraph(&mut self, block: &Token) -> DomainResult<()> {
        let target = self
            .context
            .top()
            .ok_or(DomainError::StructuralGap { line: block.line })?;
        let fields = parse_block(block)?;
        self.tree.merge_fields(target, fields);
        Ok(())
    }
}

fn parse_block(block: &Token) -> DomainResult<serde_json::Map<String, Value>> {
    let value: Value =
        serde_json::from_str(&block.content).map_err(|e| DomainError::MalformedStructuredBlock {
            line: block.line,
            message: e.to_string(),
        })?;
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(DomainError::MalformedStructuredBlock {
            line: block.line,
            message: format!("expected a JSON object, found {}", value_kind(&other)),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Tokenize and build the document tree for `source`.
pub fn parse_document(source: &str) -> DomainResult<TreeArena> {
    TreeBuilder::new().build(&tokenize(source))
}

/// Convert a heading-structured document to a JSON value without bookkeeping fields.
pub fn markdown_to_value(source: &str) -> DomainResult<Value> {
    let mut value = parse_document(source)?.to_value();
    strip_bookkeeping(&mut value);
    Ok(value)
}
