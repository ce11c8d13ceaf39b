use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Reentrancy heuristics, three independent sub-checks:
/// state written after an external call in the same statement window
/// (Critical), value transfers with no reentrancy-guard marker anywhere
/// (High), and cross-function exposure: an external call in one function
/// with state assignment in another (Medium).
pub struct Reentrancy;

const VALUE_CALLS: &[&str] = &[".call{value", ".transfer(", ".send("];
const GUARD_MARKERS: &[&str] = &["nonreentrant", "reentrancyguard"];

/// How far past the call site a state write still counts as "after the call".
const STATEMENT_WINDOW: usize = 250;

fn state_write_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\w\]]\s*(=[^=]|\+=|-=)").unwrap())
}

fn first_call_pos(source: &solguard::source::SourceText) -> Option<(usize, &'static str)> {
    VALUE_CALLS
        .iter()
        .filter_map(|p| source.find(p).map(|at| (at, *p)))
        .min_by_key(|(at, _)| *at)
}

impl Detector for Reentrancy {
    fn name(&self) -> &str {
        "reentrancy"
    }

    fn description(&self) -> &str {
        "Detects state writes after external calls and missing reentrancy guards"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let lower = source.lower();
        let mut findings = Vec::new();

        let Some((first_call, _)) = first_call_pos(source) else {
            return Ok(findings);
        };

        // (a) call followed by a state write inside the statement window
        let mut write_after_call = None;
        for pattern in VALUE_CALLS {
            let mut at = 0;
            while let Some(rel) = lower[at..].find(pattern) {
                let pos = at + rel;
                at = pos + pattern.len();
                // Start looking after the call's own statement ends.
                let Some(stmt_end) = lower[pos..].find(';').map(|i| pos + i + 1) else {
                    break;
                };
                let mut window_end = (stmt_end + STATEMENT_WINDOW).min(lower.len());
                while !lower.is_char_boundary(window_end) {
                    window_end += 1;
                }
                let mut window = &lower[stmt_end..window_end];
                // Stop at the next function header: writes in other functions
                // are the cross-function sub-check's business.
                if let Some(next_fn) = window.find("function ") {
                    window = &window[..next_fn];
                }
                if state_write_re().is_match(window) {
                    write_after_call = Some(pos);
                    break;
                }
            }
            if write_after_call.is_some() {
                break;
            }
        }
        if let Some(pos) = write_after_call {
            findings.push(Finding::new(
                self.name(),
                "State Update After External Call",
                Severity::Critical,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), pos, 16),
                "Contract state is written after an external value transfer in the \
                 same statement window; the checks-effects-interactions order is \
                 inverted.",
                "A reentrant callee re-enters before the state write lands and can \
                 drain funds, the classic reentrancy exploit.",
                "Update state before making external calls, and add a reentrancy \
                 guard.",
            ));
        }

        // (b) value transfers with no guard marker anywhere
        if !source.contains_any(GUARD_MARKERS) {
            findings.push(Finding::new(
                self.name(),
                "Missing Reentrancy Guard",
                Severity::High,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), first_call, 16),
                "The contract makes external value transfers and nothing in it \
                 carries a reentrancy guard.",
                "Every value-transferring function is a potential reentrancy entry \
                 point.",
                "Apply a `nonReentrant` modifier (e.g. OpenZeppelin ReentrancyGuard) \
                 to value-transferring functions.",
            ));
        }

        // (c) cross-function: a caller function plus a separate state-writing
        // function. Reported once, anchored at the first external-call
        // function.
        let caller = ctx
            .functions()
            .iter()
            .find(|f| f.body_contains_any(VALUE_CALLS));
        if let Some(caller) = caller {
            let other_writes = ctx.functions().iter().any(|f| {
                f.start != caller.start && state_write_re().is_match(&f.body.to_ascii_lowercase())
            });
            if other_writes {
                findings.push(Finding::new(
                    self.name(),
                    "Cross-Function Reentrancy Risk",
                    Severity::Medium,
                    Confidence::Low,
                    snippet::extract_at(
                        source.as_str(),
                        caller.start,
                        caller.text.len().min(80),
                    ),
                    format!(
                        "`{}` makes an external call while other functions write \
                         shared state; a reentrant callee can interleave them.",
                        caller.name
                    ),
                    "State invariants that hold within one function can be violated \
                     across a reentrant call chain.",
                    "Guard all state-writing functions with the same reentrancy \
                     lock.",
                ));
            }
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
        Reentrancy.detect(&ctx).unwrap()
    }

    fn names(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_state_write_after_call_is_critical() {
        let findings = analyze(
            "contract T { function withdraw() public { (bool ok, ) = msg.sender.call{value: bal}(\"\"); balances[msg.sender] = 0; } }",
        );
        assert!(names(&findings).contains(&"State Update After External Call"));
        let f = findings
            .iter()
            .find(|f| f.name == "State Update After External Call")
            .unwrap();
        assert_eq!(f.severity, Severity::Critical);
    }

    #[test]
    fn test_unguarded_transfer_flags_missing_guard() {
        let findings = analyze(
            "contract T { function payout(address to) public { payable(to).transfer(1 ether); } }",
        );
        assert!(names(&findings).contains(&"Missing Reentrancy Guard"));
    }

    #[test]
    fn test_guard_marker_suppresses_missing_guard() {
        let findings = analyze(
            "contract T is ReentrancyGuard { function payout(address to) public nonReentrant { payable(to).transfer(1 ether); } }",
        );
        assert!(!names(&findings).contains(&"Missing Reentrancy Guard"));
    }

    #[test]
    fn test_cross_function_exposure_is_medium() {
        let findings = analyze(
            "contract T { \
             function pay(address to) public { payable(to).transfer(1); } \
             function setBalance(address a, uint256 v) public { balances[a] = v; } }",
        );
        let f = findings
            .iter()
            .find(|f| f.name == "Cross-Function Reentrancy Risk")
            .unwrap();
        assert_eq!(f.severity, Severity::Medium);
        assert!(f.code_snippet.contains("pay"));
    }

    #[test]
    fn test_no_external_calls_no_findings() {
        let findings = analyze(
            "contract T { function set(uint256 v) public { stored = v; } }",
        );
        assert!(findings.is_empty());
    }
}
