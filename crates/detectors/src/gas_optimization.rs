use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;
use solguard::source::SourceText;

/// Gas-usage heuristics: storage writes inside loops, loops bounded by a
/// dynamic array's length, back-to-back storage writes, and the absence of
/// any zero-address validation.
pub struct GasOptimization;

fn storage_write_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Mapping/array writes and bare identifier assignments; typed local
    // declarations (`uint256 x = ...`) do not match.
    RE.get_or_init(|| Regex::new(r"(?m)^\s*\w+(\[[^\n=]*\])?\s*(=[^=]|\+=|-=)").unwrap())
}

fn indexed_write_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `[^\n=]*` instead of `[^\]]*` so nested indexing like `a[b[i]]` still
    // reaches the assignment operator.
    RE.get_or_init(|| Regex::new(r"\w+\s*\[[^\n=]*\]\s*(=[^=]|\+=|-=)").unwrap())
}

struct Loop<'a> {
    header: &'a str,
    body: &'a str,
    start: usize,
}

/// Locate for/while loops in the lowered view; offsets are valid in the raw
/// text as well.
fn extract_loops(source: &SourceText) -> Vec<Loop<'_>> {
    let lower = source.lower();
    let bytes = lower.as_bytes();
    let mut loops = Vec::new();

    for keyword in ["for", "while"] {
        let mut at = 0;
        while let Some(rel) = lower[at..].find(keyword) {
            let start = at + rel;
            at = start + keyword.len();
            let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
            let after = lower[start + keyword.len()..].trim_start();
            if !before_ok || !after.starts_with('(') {
                continue;
            }

            let paren_open = start + keyword.len() + (lower[start + keyword.len()..].len() - after.len());
            let Some(paren_close) = matching_close(lower, paren_open, b'(', b')') else {
                continue;
            };
            let after_header = lower[paren_close + 1..].trim_start();
            if !after_header.starts_with('{') {
                continue;
            }
            let brace_open =
                paren_close + 1 + (lower[paren_close + 1..].len() - after_header.len());
            let Some(brace_close) = matching_close(lower, brace_open, b'{', b'}') else {
                continue;
            };
            loops.push(Loop {
                header: &lower[paren_open..=paren_close],
                body: &lower[brace_open + 1..brace_close],
                start,
            });
        }
    }
    loops.sort_by_key(|l| l.start);
    loops
}

fn matching_close(text: &str, open_at: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.as_bytes().iter().enumerate().skip(open_at) {
        if *b == open {
            depth += 1;
        } else if *b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

impl Detector for GasOptimization {
    fn name(&self) -> &str {
        "gas-optimization"
    }

    fn description(&self) -> &str {
        "Detects gas-hostile patterns: storage writes in loops, unbounded loops"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn confidence(&self) -> Confidence {
        Confidence::Low
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let mut findings = Vec::new();

        let loops = extract_loops(source);

        if let Some(l) = loops.iter().find(|l| indexed_write_re().is_match(l.body)) {
            findings.push(Finding::new(
                self.name(),
                "Storage Write Inside Loop",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), l.start, 16),
                "A loop body writes storage on every iteration.",
                "Each iteration pays a full SSTORE; large inputs make the function \
                 unaffordable or undeliverable within the block gas limit.",
                "Accumulate in memory and write storage once after the loop.",
            ));
        }

        if let Some(l) = loops.iter().find(|l| l.header.contains(".length")) {
            findings.push(Finding::new(
                self.name(),
                "Unbounded Loop Over Dynamic Array",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), l.start, 16),
                "A loop is bounded by a dynamic array's length with no fixed cap.",
                "Once the array grows past the block gas limit the function can \
                 never complete, a permanent denial of service.",
                "Cap iteration counts or process the array in pages.",
            ));
        }

        let lines: Vec<&str> = source.as_str().lines().collect();
        for pair in lines.windows(2) {
            let both_write = pair
                .iter()
                .all(|l| storage_write_re().is_match(&l.to_ascii_lowercase()));
            if both_write {
                findings.push(Finding::new(
                    self.name(),
                    "Consecutive Storage Writes",
                    Severity::Low,
                    Confidence::Low,
                    format!(
                        "{}\n{}",
                        pair[0].trim(),
                        pair[1].trim()
                    ),
                    "Adjacent statements write storage back to back.",
                    "Separate SSTOREs cost more than a combined update; heavy write \
                     paths add up for every caller.",
                    "Batch related state into one struct or pack writes together.",
                ));
                break;
            }
        }

        if !source.contains("address(0)") && !source.contains("address(0x0)") {
            findings.push(Finding::new(
                self.name(),
                "Missing Zero-Address Validation",
                Severity::Low,
                Confidence::Low,
                "",
                "No zero-address check appears anywhere in the contract.",
                "Transfers or privileged assignments to address(0) burn funds or \
                 brick roles irrecoverably.",
                "Add `require(addr != address(0))` to address-accepting entry \
                 points.",
            ));
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> Vec<Finding> {
        let source = SourceText::new(source.to_string());
        let ctx = AuditContext::new(&source, None, None, None);
        GasOptimization.detect(&ctx).unwrap()
    }

    fn names(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_storage_write_in_loop() {
        let findings = analyze(
            "contract T { function air(address[] memory to) public { require(to.length < 100); for (uint i = 0; i < 100; i++) { balances[to[i]] = 1; } } }",
        );
        assert!(names(&findings).contains(&"Storage Write Inside Loop"));
    }

    #[test]
    fn test_length_bounded_loop() {
        let findings = analyze(
            "contract T { function air(address[] memory to) public { require(to[0] != address(0)); for (uint i = 0; i < to.length; i++) { sum += 1; } } }",
        );
        assert!(names(&findings).contains(&"Unbounded Loop Over Dynamic Array"));
    }

    #[test]
    fn test_consecutive_storage_writes() {
        let findings = analyze(
            "contract T { function f() public { require(a != address(0));\ntotalStaked += 1;\nrewards[msg.sender] += 2;\n } }",
        );
        assert!(names(&findings).contains(&"Consecutive Storage Writes"));
    }

    #[test]
    fn test_missing_zero_address_check() {
        let findings = analyze("contract T { function f(address a) public { owner = a; } }");
        assert!(names(&findings).contains(&"Missing Zero-Address Validation"));
    }

    #[test]
    fn test_zero_address_check_present() {
        let findings = analyze(
            "contract T { function f(address a) public { require(a != address(0)); emit Set(a);\nowner = a; } }",
        );
        assert!(!names(&findings).contains(&"Missing Zero-Address Validation"));
    }
}
