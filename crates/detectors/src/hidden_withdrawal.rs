use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Detects owner-gated value transfers hiding behind innocuous names.
/// An `onlyOwner` function that moves value is expected to say so:
/// `withdraw`, `rescue`, `claimFees`. One that does it under an unrelated
/// name, in a contract with no withdrawal vocabulary at all, is the classic
/// drain backdoor.
pub struct HiddenWithdrawal;

const VALUE_TRANSFER: &[&str] = &[".transfer(", ".send(", ".call{value"];
const NAMING_CONTEXT: &[&str] = &["emergency", "rescue", "recover", "fee", "withdraw"];
const ALLOWED_NAMES: &[&str] = &[
    "withdraw",
    "rescue",
    "emergencywithdraw",
    "recovereth",
    "claimfees",
];

impl Detector for HiddenWithdrawal {
    fn name(&self) -> &str {
        "hidden-withdrawal"
    }

    fn description(&self) -> &str {
        "Detects onlyOwner functions that move value under non-withdrawal names"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        // Any legitimate withdrawal vocabulary anywhere in the source
        // suppresses the whole family: the author is not hiding anything.
        if ctx.source().contains_any(NAMING_CONTEXT) {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for func in ctx.functions() {
            if !func.text_contains("onlyowner") {
                continue;
            }
            if !func.body_contains_any(VALUE_TRANSFER) {
                continue;
            }
            if func.name_in(ALLOWED_NAMES) {
                continue;
            }
            findings.push(Finding::new(
                self.name(),
                "Hidden Withdrawal Function",
                Severity::High,
                self.confidence(),
                snippet::extract_at(ctx.source().as_str(), func.start, func.text.len().min(80)),
                format!(
                    "Function `{}` is owner-gated and transfers value, but neither its \
                     name nor anything else in the contract describes a withdrawal.",
                    func.name
                ),
                "The owner can quietly drain ETH or tokens held by the contract.",
                "Name value-moving functions for what they do and document who may \
                 call them, or remove the transfer path.",
            ));
        }
        Ok(findings)
    }
}
