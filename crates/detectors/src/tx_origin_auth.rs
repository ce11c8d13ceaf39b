use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::{guard, snippet};

/// Detects `tx.origin` misuse. Comparing `tx.origin` for authorization is a
/// phishing vector (any contract the victim calls inherits their origin);
/// other uses are flagged softer unless framed as MEV protection.
pub struct TxOriginAuth;

const AUTH_COMPARE: &[&str] = &[
    "tx.origin ==",
    "== tx.origin",
    "tx.origin !=",
    "!= tx.origin",
    "require(tx.origin",
];
const MEV_CONTEXT: &[&str] = &["mev", "sandwich", "frontrun", "front-run"];

impl Detector for TxOriginAuth {
    fn name(&self) -> &str {
        "tx-origin-auth"
    }

    fn description(&self) -> &str {
        "Detects tx.origin used for authentication or without MEV framing"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        if !source.contains("tx.origin") {
            return Ok(Vec::new());
        }

        if let Some(matched) = guard::first_match(source, AUTH_COMPARE) {
            return Ok(vec![Finding::new(
                self.name(),
                "Unsafe Authentication Pattern: tx.origin",
                Severity::High,
                Confidence::High,
                snippet::extract(source, matched),
                "`tx.origin` is compared for authorization. Any contract the \
                 authorized user is tricked into calling passes this check.",
                "A phishing contract can act with the victim's full privileges.",
                "Authenticate with `msg.sender` instead of `tx.origin`.",
            )]);
        }

        if source.contains_any(MEV_CONTEXT) {
            return Ok(Vec::new());
        }

        Ok(vec![Finding::new(
            self.name(),
            "tx.origin Usage",
            Severity::Medium,
            Confidence::Medium,
            snippet::extract(source, "tx.origin"),
            "`tx.origin` is used outside an authentication comparison and without \
             MEV-protection framing.",
            "Logic keyed to the transaction originator behaves surprisingly \
             through contract wallets and multicalls.",
            "Prefer `msg.sender`; if the originator check is deliberate \
             anti-contract protection, document it as such.",
        )])
    }
}
