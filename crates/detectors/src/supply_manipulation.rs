use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;
use solguard::source::FunctionDef;

/// Detects `totalSupply` writes outside the contexts where supply changes
/// legitimately happen (constructor, initializer, mint, burn), plus an
/// excess of owner-gated mint/burn-named functions beyond the canonical set.
pub struct SupplyManipulation;

const ALLOWED_CONTEXT: &[&str] = &["constructor", "initialize", "mint", "burn"];
const CANONICAL_SUPPLY_FNS: &[&str] = &["mint", "burn", "mintto", "burnfrom"];

fn supply_write_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)_?totalsupply\s*(=[^=]|\+=|-=|\+\+|--)").unwrap())
}

fn enclosing<'f>(functions: &'f [FunctionDef], pos: usize) -> Option<&'f FunctionDef> {
    functions
        .iter()
        .filter(|f| f.start <= pos && pos < f.start + f.text.len())
        .last()
}

fn in_allowed_context(func: &FunctionDef) -> bool {
    ALLOWED_CONTEXT.iter().any(|c| func.name_contains(c))
}

impl Detector for SupplyManipulation {
    fn name(&self) -> &str {
        "supply-manipulation"
    }

    fn description(&self) -> &str {
        "Detects direct totalSupply writes outside mint/burn context"
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

        for m in supply_write_re().find_iter(source.as_str()) {
            let Some(func) = enclosing(ctx.functions(), m.start()) else {
                // Contract-level declaration initializers are deployment-time
                // writes, not runtime manipulation.
                continue;
            };
            if in_allowed_context(func) {
                continue;
            }
            findings.push(Finding::new(
                self.name(),
                "Direct Supply Manipulation",
                Severity::High,
                self.confidence(),
                snippet::extract_at(source.as_str(), m.start(), m.len()),
                format!(
                    "`totalSupply` is written directly inside `{}`, outside any \
                     constructor, initializer, mint, or burn path.",
                    func.name
                ),
                "Reported supply can be changed without corresponding balance \
                 changes, breaking the token's accounting invariants.",
                "Only change totalSupply through mint and burn paths that adjust \
                 balances in the same operation.",
            ));
        }

        let privileged: Vec<&FunctionDef> = ctx
            .functions()
            .iter()
            .filter(|f| f.text_contains("onlyowner"))
            .filter(|f| f.name_contains("mint") || f.name_contains("burn"))
            .filter(|f| !f.name_in(CANONICAL_SUPPLY_FNS))
            .collect();
        if privileged.len() > 2 {
            let first = privileged[0];
            findings.push(Finding::new(
                self.name(),
                "Excessive Privileged Supply Functions",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), first.start, first.text.len().min(80)),
                format!(
                    "{} owner-gated functions beyond the canonical mint/burn set can \
                     change supply.",
                    privileged.len()
                ),
                "A wide privileged surface makes it hard to reason about who can \
                 inflate or deflate the token.",
                "Consolidate supply changes into the canonical mint/burn functions.",
            ));
        }

        Ok(findings)
    }
}
