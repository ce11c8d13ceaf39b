//! Whole-source co-occurrence guard.
//!
//! Nearly every detector reduces to "does X appear, unless Y also appears".
//! The suppression test is deliberately coarse: a safe-context marker
//! anywhere in the file suppresses a risky pattern anywhere else. Detectors
//! accept the false-negative risk in exchange for simplicity, and the
//! behavior is pinned by the engine's test suite; do not scope it to the
//! enclosing function.

use crate::source::SourceText;

/// Returns true only if at least one risky pattern occurs in the source and
/// no safe-context pattern occurs anywhere in it.
pub fn risky_without_context(source: &SourceText, risky: &[&str], safe: &[&str]) -> bool {
    if !source.contains_any(risky) {
        return false;
    }
    !source.contains_any(safe)
}

/// The first risky pattern that actually occurs, for snippet extraction.
pub fn first_match<'p>(source: &SourceText, patterns: &[&'p str]) -> Option<&'p str> {
    patterns.iter().find(|p| source.contains(p)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(text: &str) -> SourceText {
        SourceText::new(text.to_string())
    }

    #[test]
    fn test_risky_absent() {
        let source = src("contract Token { function transfer() public {} }");
        assert!(!risky_without_context(
            &source,
            &["selfdestruct"],
            &["timelock"]
        ));
    }

    #[test]
    fn test_risky_present_no_safe_context() {
        let source = src("function renounce() public { transferOwnership(addr); }");
        assert!(risky_without_context(
            &source,
            &["transferownership"],
            &["timelock", "governance"]
        ));
    }

    #[test]
    fn test_any_safe_marker_suppresses() {
        // The marker need not be anywhere near the risky pattern.
        let source = src(
            "// protected by a 48h timelock\nfunction renounce() public { transferOwnership(addr); }",
        );
        assert!(!risky_without_context(
            &source,
            &["transferownership"],
            &["timelock", "governance"]
        ));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let source = src("function setOwner() public { TransferOwnership(addr); }");
        assert!(risky_without_context(&source, &["transferownership"], &[]));
        let guarded = src("contract T is TimeLock { TransferOwnership(addr); }");
        assert!(!risky_without_context(
            &guarded,
            &["transferownership"],
            &["timelock"]
        ));
    }

    #[test]
    fn test_first_match_returns_occurring_pattern() {
        let source = src("mapping(address => bool) public blocklist;");
        assert_eq!(
            first_match(&source, &["blacklist", "blocklist"]),
            Some("blocklist")
        );
        assert_eq!(first_match(&source, &["whitelist"]), None);
    }
}
