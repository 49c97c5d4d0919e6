//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent conversion failures.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed structured block at line {line}: {message}")]
    MalformedStructuredBlock { line: usize, message: String },

    #[error("structured block at line {line} has no enclosing heading")]
    StructuralGap { line: usize },

    #[error("workbook schema mismatch at `{path}`: expected {expected}")]
    SchemaMismatch { path: String, expected: String },
}

impl DomainError {
    pub(crate) fn schema(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            path: path.into(),
            expected: expected.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
