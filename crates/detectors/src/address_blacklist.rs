use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::{guard, snippet};

/// Detects blacklist/blocklist state without anti-bot, compliance, or
/// sanctions framing. A bare deny-list in a token is a honeypot primitive:
/// buyers can be barred from ever selling.
pub struct AddressBlacklist;

const RISKY: &[&str] = &["blacklist", "blocklist", "isblacklisted", "banned"];
const SAFE_CONTEXT: &[&str] = &["antibot", "anti-bot", "compliance", "sanction"];

impl Detector for AddressBlacklist {
    fn name(&self) -> &str {
        "address-blacklist"
    }

    fn description(&self) -> &str {
        "Detects address deny-lists without compliance or anti-bot framing"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        if !guard::risky_without_context(source, RISKY, SAFE_CONTEXT) {
            return Ok(Vec::new());
        }
        let matched = guard::first_match(source, RISKY).unwrap_or(RISKY[0]);
        Ok(vec![Finding::new(
            self.name(),
            "Address Blacklist Capability",
            Severity::Medium,
            self.confidence(),
            snippet::extract(source, matched),
            "The contract keeps a deny-list of addresses and nothing frames it as \
             an anti-bot or compliance measure.",
            "Arbitrary holders can be blocked from transferring or selling their \
             tokens.",
            "Remove the deny-list, or scope it to a documented compliance process \
             with an auditable admin trail.",
        )])
    }
}
