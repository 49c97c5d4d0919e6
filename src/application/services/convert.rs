//! Conversion service
//!
//! Markdown workbook documents to JSON and back, with frontmatter handling
//! and file I/O through the injected [`FileSystem`].

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    parse_document, split_frontmatter, strip_bookkeeping, tokenize, workbook_to_markdown,
    Frontmatter, Token,
};
use crate::infrastructure::traits::FileSystem;

/// Options for the markdown to JSON direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Keep `tag`/`markup` on every node (debugging aid)
    pub keep_bookkeeping: bool,
}

/// Result of converting a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutput {
    /// YAML frontmatter split off the document, if any
    pub frontmatter: Option<String>,
    /// Pretty-printed JSON tree
    pub json: String,
}

/// Service converting between heading-structured markdown and JSON.
pub struct ConversionService {
    fs: Arc<dyn FileSystem>,
    indent: usize,
}

impl ConversionService {
    pub fn new(fs: Arc<dyn FileSystem>, indent: usize) -> Self {
        Self { fs, indent }
    }

    /// Convert markdown text to a JSON document.
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn markdown_to_json(
        &self,
        text: &str,
        options: ConvertOptions,
    ) -> ApplicationResult<ConvertOutput> {
        let (frontmatter, body) = match split_frontmatter(text) {
            Some(Frontmatter { yaml, body }) => (Some(yaml), body),
            None => (None, text.to_string()),
        };

        let mut value = parse_document(&body)?.to_value();
        if !options.keep_bookkeeping {
            strip_bookkeeping(&mut value);
        }
        debug!(has_frontmatter = frontmatter.is_some(), "document converted");

        Ok(ConvertOutput {
            frontmatter,
            json: self.to_pretty_json(&value)?,
        })
    }

    /// Convert a workbook JSON document back to markdown.
    ///
    /// A non-empty `frontmatter` is re-attached at the top.
    #[instrument(level = "debug", skip_all, fields(len = json_text.len()))]
    pub fn json_to_markdown(
        &self,
        json_text: &str,
        frontmatter: Option<&str>,
    ) -> ApplicationResult<String> {
        let value: Value = serde_json::from_str(json_text)?;
        let body = workbook_to_markdown(&value)?;
        Ok(match frontmatter.map(str::trim).filter(|yaml| !yaml.is_empty()) {
            Some(yaml) => Frontmatter::render(yaml, &body),
            None => body,
        })
    }

    pub fn convert_file_to_json(
        &self,
        path: &Path,
        options: ConvertOptions,
    ) -> ApplicationResult<ConvertOutput> {
        debug!("convert_file_to_json: {}", path.display());
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read markdown", path)?;
        self.markdown_to_json(&text, options)
    }

    pub fn convert_file_to_markdown(
        &self,
        path: &Path,
        frontmatter: Option<&str>,
    ) -> ApplicationResult<String> {
        debug!("convert_file_to_markdown: {}", path.display());
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read json", path)?;
        self.json_to_markdown(&text, frontmatter)
    }

    /// Write `content` to `path`, creating parent folders.
    pub fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent folder", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write output", path)
    }

    /// Heading outline of a document, frontmatter excluded.
    pub fn outline(&self, text: &str, label: &str) -> ApplicationResult<Tree<String>> {
        let tree = parse_document(&body_of(text))?;
        Ok(tree.to_tree_string(label))
    }

    /// Token stream of a document, frontmatter excluded.
    pub fn tokens(&self, text: &str) -> Vec<Token> {
        tokenize(&body_of(text))
    }

    fn to_pretty_json(&self, value: &Value) -> ApplicationResult<String> {
        let indent = " ".repeat(self.indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut ser)
            .map_err(|e| ApplicationError::OperationFailed {
                context: "serialize JSON output".to_string(),
                source: Box::new(e),
            })?;
        String::from_utf8(buf).map_err(|e| ApplicationError::OperationFailed {
            context: "encode JSON output".to_string(),
            source: Box::new(e),
        })
    }
}

fn body_of(text: &str) -> String {
    split_frontmatter(text)
        .map(|split| split.body)
        .unwrap_or_else(|| text.to_string())
}
