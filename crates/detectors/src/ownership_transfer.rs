use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::{guard, snippet};

/// Detects ownership-transfer capability without governance protections.
/// Raw `transferOwnership`/owner reassignment with no timelock, governance,
/// or multisig marker lets a single key hand the contract to anyone.
pub struct OwnershipTransfer;

const RISKY: &[&str] = &["transferownership", "newowner", "owner = "];
const SAFE_CONTEXT: &[&str] = &["timelock", "governance", "multisig"];
const ZERO_GUARD: &[&str] = &["owner != address(0)"];

impl Detector for OwnershipTransfer {
    fn name(&self) -> &str {
        "ownership-transfer"
    }

    fn description(&self) -> &str {
        "Detects ownership transfer paths without timelock, governance, or multisig protection"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        if !guard::risky_without_context(source, RISKY, SAFE_CONTEXT) {
            return Ok(Vec::new());
        }

        // A zero-address guard on the incoming owner does not remove the
        // rug-pull surface, but it rules out the accidental-burn variant.
        let severity = if source.contains_any(ZERO_GUARD) {
            Severity::Medium
        } else {
            Severity::High
        };

        let matched = guard::first_match(source, RISKY).unwrap_or(RISKY[0]);
        Ok(vec![Finding::new(
            self.name(),
            "Ownership Transfer Risk",
            severity,
            self.confidence(),
            snippet::extract(source, matched),
            "The contract owner can be reassigned without a timelock, governance \
             process, or multisig approval.",
            "A single compromised or malicious key can hand full control of the \
             token to an arbitrary address.",
            "Put ownership changes behind a timelock or multisig, or renounce \
             ownership after launch.",
        )])
    }
}
