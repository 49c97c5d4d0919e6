//! YAML frontmatter carried at the top of workbook documents.
//!
//! The YAML itself is never interpreted; it is split off before conversion
//! and re-attached afterwards.

use std::sync::LazyLock;

use regex::Regex;

static FRONTMATTER_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{3}\n([\s\S]*?)-{3}\n([\s\S]*)").expect("valid regex"));
static FRONTMATTER_EXTRACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{3}\n([\s\S]*?)-{3}").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub yaml: String,
    pub body: String,
}

impl Frontmatter {
    /// Re-assemble the document: `---\n<yaml>\n---\n<body>`.
    pub fn render(yaml: &str, body: &str) -> String {
        format!("---\n{}\n---\n{}", yaml.trim(), body)
    }
}

/// Split a leading frontmatter block from the document body.
pub fn split_frontmatter(text: &str) -> Option<Frontmatter> {
    let caps = FRONTMATTER_SPLIT.captures(text)?;
    Some(Frontmatter {
        yaml: caps.get(1)?.as_str().trim().to_string(),
        body: caps.get(2)?.as_str().trim().to_string(),
    })
}

/// YAML part of a leading frontmatter block, trimmed.
pub fn extract_frontmatter(text: &str) -> Option<String> {
    FRONTMATTER_EXTRACT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
