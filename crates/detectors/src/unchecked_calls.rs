use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Line-level scan for external calls whose outcome nobody looks at.
/// `.send` and low-level `.call` failures are silent unless checked on the
/// same or following line; ERC-20 style calls that return `bool` into the
/// void are flagged softer.
pub struct UncheckedCalls;

const RETURN_BOOL_CALLS: &[&str] = &[".transferfrom(", ".approve("];

fn is_code_line(line: &str) -> bool {
    let t = line.trim_start();
    !t.is_empty() && !t.starts_with("//") && !t.starts_with('*') && !t.starts_with("/*")
}

fn checked_nearby(line: &str, next: &str) -> bool {
    let t = line.trim_start();
    line.contains("require")
        || t.starts_with("if")
        || t.starts_with("return")
        || next.contains("require")
        || next.trim_start().starts_with("if")
}

impl Detector for UncheckedCalls {
    fn name(&self) -> &str {
        "unchecked-calls"
    }

    fn description(&self) -> &str {
        "Detects external calls whose success is never checked"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let lines: Vec<&str> = source.as_str().lines().collect();
        let mut findings = Vec::new();

        for (i, raw_line) in lines.iter().copied().enumerate() {
            if !is_code_line(raw_line) {
                continue;
            }
            let line = raw_line.to_ascii_lowercase();
            let next = lines
                .get(i + 1)
                .map(|l| l.to_ascii_lowercase())
                .unwrap_or_default();

            if line.contains(".send(") && !checked_nearby(&line, &next) {
                findings.push(Finding::new(
                    self.name(),
                    "Unchecked send() Call",
                    Severity::High,
                    Confidence::High,
                    snippet::collapse_whitespace(raw_line),
                    "`.send()` returns false on failure instead of reverting, and \
                     nothing checks the result.",
                    "A failed transfer passes silently; funds accounting and the \
                     actual balance drift apart.",
                    "Check the returned bool with `require`, or use `.call` with an \
                     explicit success check.",
                ));
                continue;
            }

            if (line.contains(".call{value") || line.contains(".call("))
                && !checked_nearby(&line, &next)
            {
                findings.push(Finding::new(
                    self.name(),
                    "Unchecked Low-Level Call",
                    Severity::High,
                    Confidence::Medium,
                    snippet::collapse_whitespace(raw_line),
                    "A low-level call's success flag is never checked with `require` \
                     or `if`.",
                    "Failures are swallowed; downstream logic proceeds as if the \
                     call had succeeded.",
                    "Capture the success flag and `require` it.",
                ));
                continue;
            }

            if line.contains(".transfer(")
                && !line.contains("require")
                && !line.contains('=')
                && !line.trim_start().starts_with("if")
                && !line.trim_start().starts_with("return")
            {
                findings.push(Finding::new(
                    self.name(),
                    "Unchecked transfer() Call",
                    Severity::Medium,
                    Confidence::Low,
                    snippet::collapse_whitespace(raw_line),
                    "A `.transfer(...)` result is discarded. For ERC-20 tokens that \
                     return false instead of reverting, this hides failures.",
                    "Non-reverting token transfers can fail without anyone noticing.",
                    "Use SafeERC20's safeTransfer, or require the returned bool.",
                ));
                continue;
            }

            if RETURN_BOOL_CALLS.iter().any(|p| line.contains(p))
                && !line.contains('=')
                && !line.contains("require")
                && !line.trim_start().starts_with("if")
                && !line.trim_start().starts_with("return")
            {
                findings.push(Finding::new(
                    self.name(),
                    "Ignored Call Return Value",
                    Severity::Low,
                    Confidence::Low,
                    snippet::collapse_whitespace(raw_line),
                    "A bool-returning token call is used as a bare statement; its \
                     result is dropped.",
                    "Failed approvals or transfers go unnoticed.",
                    "Assign and check the returned bool, or use SafeERC20 wrappers.",
                ));
            }
        }

        Ok(findings)
    }
}
