use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Proxy and storage-layout checks. The initializer check always runs (an
/// unguarded `initialize` is dangerous on its own, Critical once proxy
/// markers confirm upgradeability); the rest of the family only fires in
/// contracts that actually look like proxies.
pub struct ProxyStorage;

const PROXY_MARKERS: &[&str] = &["delegatecall", "proxy", "_implementation", "upgradeable"];
const INIT_GUARDS: &[&str] = &["initializer", "onlyinitializing", "initialized"];

fn upgradeable_inherit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)contract\s+\w+\s+is\s+[^{]*upgradeable").unwrap())
}

fn state_var_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^\s*(?:mapping\s*\([^;]*|(?:uint\d*|int\d*|address|bool|string|bytes\d*)\s+(?:public\s+|private\s+|internal\s+)?\w+)\s*;",
        )
        .unwrap()
    })
}

impl Detector for ProxyStorage {
    fn name(&self) -> &str {
        "proxy-storage"
    }

    fn description(&self) -> &str {
        "Detects unprotected initializers, storage collisions, and delegatecall use"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let proxylike = source.contains_any(PROXY_MARKERS);
        let mut findings = Vec::new();

        let unguarded_init = ctx
            .functions()
            .iter()
            .find(|f| f.name_is("initialize") && !f.text_contains_any(INIT_GUARDS));
        if let Some(func) = unguarded_init {
            let (name, severity) = if proxylike {
                ("Unprotected Initializer", Severity::Critical)
            } else {
                // Without proxy markers the signal is weaker: the contract may
                // never be deployed behind a proxy at all.
                ("Potentially Unprotected Initializer", Severity::Medium)
            };
            findings.push(Finding::new(
                self.name(),
                name,
                severity,
                self.confidence(),
                snippet::extract_at(source.as_str(), func.start, func.text.len().min(80)),
                "`initialize` carries no initializer guard, so it can be called \
                 again after deployment.",
                "Whoever calls it first, or next, takes ownership of the \
                 contract's configuration.",
                "Apply OpenZeppelin's `initializer` modifier or an equivalent \
                 one-shot latch.",
            ));
        }

        if !proxylike {
            return Ok(findings);
        }

        if let Some(m) = state_var_re()
            .find(source.as_str())
            .filter(|_| upgradeable_inherit_re().is_match(source.as_str()))
        {
            findings.push(Finding::new(
                self.name(),
                "Storage Layout Collision Risk",
                Severity::High,
                Confidence::Low,
                snippet::extract_at(source.as_str(), m.start(), m.len()),
                "State variables are declared directly in an Upgradeable-inheriting \
                 contract.",
                "A future implementation that reorders or inserts variables shifts \
                 every slot after it, silently corrupting live state.",
                "Reserve storage gaps and only append new variables at the end of \
                 the layout.",
            ));
        }

        if source.contains("delegatecall(") {
            findings.push(Finding::new(
                self.name(),
                "Delegatecall Usage",
                Severity::High,
                Confidence::Medium,
                snippet::extract(source, "delegatecall("),
                "The contract executes foreign code in its own storage context via \
                 delegatecall.",
                "If the target is attacker-influenced, the attacker rewrites any \
                 storage slot, ownership included.",
                "Restrict delegatecall targets to immutable, audited \
                 implementations.",
            ));
        }

        Ok(findings)
    }
}
