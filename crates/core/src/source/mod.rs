//! Source text access and the engine's input precondition.

pub mod functions;
pub mod parser;

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub use functions::{extract_functions, FunctionDef};

/// Contract source with a precomputed ASCII-lowered view.
///
/// All pattern and guard matching is case-insensitive: marker vocabularies
/// like `timelock` must also catch `TimeLock`. ASCII lowering preserves byte
/// positions, so an offset found in the lowered view indexes the raw text
/// directly; snippet extraction relies on this.
pub struct SourceText {
    raw: String,
    lower: String,
}

impl SourceText {
    pub fn new(raw: String) -> Self {
        let lower = raw.to_ascii_lowercase();
        Self { raw, lower }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// Case-insensitive containment. `pattern` must already be lowercase.
    pub fn contains(&self, pattern: &str) -> bool {
        self.lower.contains(pattern)
    }

    pub fn contains_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|p| self.lower.contains(p))
    }

    /// Byte offset of the first case-insensitive match, valid in `as_str()`.
    pub fn find(&self, pattern: &str) -> Option<usize> {
        self.lower.find(pattern)
    }

    /// Count of non-overlapping case-insensitive occurrences.
    pub fn count(&self, pattern: &str) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        self.lower.matches(pattern).count()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("source text is empty")]
    Empty,
    #[error("source contains no pragma and no contract, interface, or library declaration")]
    NoContractDeclaration,
}

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?mi)^\s*(abstract\s+)?(contract|interface|library)\s+[A-Za-z_]").unwrap()
    })
}

/// Engine precondition: the audit never starts on source that cannot be
/// confirmed to contain a recognizable contract. Callers must reject before
/// invoking the engine; this is not a recoverable engine-internal error.
pub fn validate_source(source: &str) -> Result<(), SourceError> {
    if source.trim().is_empty() {
        return Err(SourceError::Empty);
    }
    if source.contains("pragma") || declaration_re().is_match(source) {
        return Ok(());
    }
    Err(SourceError::NoContractDeclaration)
}
