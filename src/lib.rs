//! sheetmd: heading-structured markdown workbooks as JSON trees.
//!
//! A markdown document whose headings spell out a hierarchy, with JSON
//! object paragraphs under them, converts into a nested JSON object keyed by
//! heading titles. The reverse direction writes a spreadsheet-shaped object
//! (`workbook` / `sheets` / `cellData` / row / column) as such a document.
//!
//! Layers:
//! - [`domain`]: tokenizer, tree builder, bookkeeping stripper, workbook serializer
//! - [`application`]: conversion and workbook-file services
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument parsing, dispatch and terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
