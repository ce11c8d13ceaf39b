use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Integer-safety heuristics. Wrapping arithmetic is only a live concern
/// under pre-0.8 compilers without SafeMath; fixed-width downcasts truncate
/// on every compiler version.
pub struct IntegerOverflow;

const SMALL_INT_THRESHOLD: usize = 5;

fn pragma_minor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)pragma\s+solidity\s*[^;]*?0\.([0-9]+)").unwrap())
}

fn arithmetic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Binary +, -, * between identifiers/calls; increments and compound
    // assignments deliberately excluded.
    RE.get_or_init(|| Regex::new(r"[a-z0-9_\)\]]\s*[+\-*]\s*[a-z0-9_\(]").unwrap())
}

fn downcast_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\buint(8|16|32|64|128)\s*\(").unwrap())
}

fn pre_08(source: &str) -> bool {
    pragma_minor_re()
        .captures(source)
        .and_then(|c| c[1].parse::<u32>().ok())
        .is_some_and(|minor| minor < 8)
}

impl Detector for IntegerOverflow {
    fn name(&self) -> &str {
        "integer-overflow"
    }

    fn description(&self) -> &str {
        "Detects unchecked arithmetic under pre-0.8 compilers and unsafe downcasts"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let mut findings = Vec::new();

        let legacy = pre_08(source.as_str());
        let has_safemath = source.contains("safemath");

        if legacy && !has_safemath {
            if let Some(m) = arithmetic_re().find(source.lower()) {
                findings.push(Finding::new(
                    self.name(),
                    "Integer Overflow Risk (Pre-0.8 Compiler)",
                    Severity::High,
                    Confidence::Medium,
                    snippet::extract_at(source.as_str(), m.start(), m.len()),
                    "The contract targets a pre-0.8 compiler, uses raw arithmetic, \
                     and does not import SafeMath.",
                    "Arithmetic wraps silently; balances and supplies can overflow \
                     or underflow.",
                    "Upgrade the pragma to ^0.8.0 or route all arithmetic through \
                     SafeMath.",
                ));
            }

            let small_ints = source.count("uint8 ") + source.count("uint16 ");
            if small_ints > SMALL_INT_THRESHOLD {
                findings.push(Finding::new(
                    self.name(),
                    "Small Integer Arithmetic Under Pre-0.8 Compiler",
                    Severity::Low,
                    Confidence::Low,
                    snippet::extract(source, "uint8 "),
                    format!(
                        "{small_ints} uint8/uint16 declarations under a pre-0.8 \
                         compiler without SafeMath."
                    ),
                    "Narrow types reach their wrap point far sooner than uint256.",
                    "Use uint256 unless packing demands otherwise, and add checked \
                     arithmetic.",
                ));
            }
        }

        if let Some(m) = downcast_re().find(source.as_str()) {
            let count = downcast_re().find_iter(source.as_str()).count();
            findings.push(Finding::new(
                self.name(),
                "Unsafe Integer Downcast",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), m.start(), m.len()),
                format!(
                    "{count} fixed-width cast(s) like `uintN(x)` truncate silently \
                     on every compiler version."
                ),
                "Values above the target width are silently cut down, corrupting \
                 amounts.",
                "Use OpenZeppelin SafeCast or bounds-check before narrowing.",
            ));
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solguard::source::SourceText;

    fn analyze(source: &str) -> Vec<Finding> {
        let source = SourceText::new(source.to_string());
        let ctx = AuditContext::new(&source, None, None, None);
        IntegerOverflow.detect(&ctx).unwrap()
    }

    #[test]
    fn test_pre_08_arithmetic_without_safemath() {
        let findings = analyze(
            "pragma solidity ^0.6.12;\ncontract T { function f(uint256 a, uint256 b) public { uint256 c = a + b; } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Integer Overflow Risk (Pre-0.8 Compiler)");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_safemath_suppresses() {
        let findings = analyze(
            "pragma solidity ^0.6.12;\nimport \"./SafeMath.sol\";\ncontract T { using SafeMath for uint256; function f(uint256 a, uint256 b) public { uint256 c = a + b; } }",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_08_arithmetic_is_fine() {
        let findings = analyze(
            "pragma solidity ^0.8.19;\ncontract T { function f(uint256 a, uint256 b) public { uint256 c = a + b; } }",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_downcast_is_medium_on_any_version() {
        let findings = analyze(
            "pragma solidity ^0.8.19;\ncontract T { function f(uint256 a) public { uint64 b = uint64(a); } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Unsafe Integer Downcast");
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_many_small_ints_pre_08() {
        let decls = "uint8 a; uint8 b; uint8 c; uint16 d; uint16 e; uint8 f; ";
        let findings = analyze(&format!(
            "pragma solidity ^0.7.6;\ncontract T {{ {decls} }}"
        ));
        let low = findings
            .iter()
            .find(|f| f.name == "Small Integer Arithmetic Under Pre-0.8 Compiler")
            .unwrap();
        assert_eq!(low.severity, Severity::Low);
    }
}
