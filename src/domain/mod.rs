//! Domain layer: tokens, the document tree and the conversions between them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod frontmatter;
pub mod inline;
pub mod strip;
pub mod token;
pub mod tokenizer;
pub mod workbook;

pub use arena::{Slot, TreeArena, TreeNode};
pub use builder::{markdown_to_value, parse_document, ParseContext, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use frontmatter::{extract_frontmatter, split_frontmatter, Frontmatter};
pub use inline::render_inline;
pub use strip::{strip_bookkeeping, stripped_shallow, BOOKKEEPING_KEYS};
pub use token::{Nesting, Token, TokenKind};
pub use tokenizer::tokenize;
pub use workbook::workbook_to_markdown;
