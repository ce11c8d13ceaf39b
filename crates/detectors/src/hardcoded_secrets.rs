use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Scans for literals that should never be in verified source: foreign
/// addresses, private-key-shaped hex, and quoted secret assignments.
/// Key- and secret-shaped findings redact the snippet: repeating the
/// literal in an audit report would republish it.
pub struct HardcodedSecrets;

fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b0x[0-9a-fA-F]{40}\b").unwrap())
}

fn private_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b0x[0-9a-fA-F]{64}\b").unwrap())
}

fn secret_assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)(api[_-]?key|api[_-]?secret|secret[_-]?key|password|private[_-]?key)\s*[:=]\s*["'][^"']{8,}["']"#,
        )
        .unwrap()
    })
}

impl Detector for HardcodedSecrets {
    fn name(&self) -> &str {
        "hardcoded-secrets"
    }

    fn description(&self) -> &str {
        "Detects hardcoded addresses, private-key-shaped literals, and secrets"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let text = source.as_str();
        let mut findings = Vec::new();

        if private_key_re().is_match(text) {
            findings.push(Finding::new(
                self.name(),
                "Hardcoded Private Key",
                Severity::Critical,
                Confidence::Medium,
                "", // redacted
                "A 64-hex-character literal shaped like a private key is embedded \
                 in the source. The value is redacted from this report.",
                "Anyone reading the verified source controls the corresponding \
                 account; every asset it holds or guards is already lost.",
                "Rotate the key immediately and remove all secrets from on-chain \
                 source.",
            ));
        }

        if secret_assign_re().is_match(text) {
            findings.push(Finding::new(
                self.name(),
                "Hardcoded Secret",
                Severity::Critical,
                Confidence::Medium,
                "", // redacted
                "An API-key or secret-shaped string is assigned in the source. The \
                 value is redacted from this report.",
                "Verified contract source is public; the credential is already \
                 exposed.",
                "Revoke the credential and keep secrets out of contract code.",
            ));
        }

        let own = ctx
            .contract_address()
            .map(|a| a.trim_start_matches("0x").to_ascii_lowercase());
        let foreign: Vec<_> = address_re()
            .find_iter(text)
            .filter(|m| {
                let hex = m.as_str().trim_start_matches("0x").to_ascii_lowercase();
                own.as_deref() != Some(hex.as_str())
            })
            .collect();
        if let Some(first) = foreign.first() {
            findings.push(Finding::new(
                self.name(),
                "Hardcoded Address",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract_at(text, first.start(), first.len()),
                format!(
                    "{} hardcoded address literal(s) other than the contract's own \
                     address appear in the source.",
                    foreign.len()
                ),
                "Hardcoded counterparties cannot be rotated and may route funds or \
                 privileges to unexpected parties.",
                "Make external addresses constructor parameters or admin-updatable \
                 configuration.",
            ));
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solguard::source::SourceText;

    const OWN: &str = "0x1111111111111111111111111111111111111111";

    fn analyze_with_address(source: &str, address: Option<&str>) -> Vec<Finding> {
        let source = SourceText::new(source.to_string());
        let ctx = AuditContext::new(&source, None, None, address);
        HardcodedSecrets.detect(&ctx).unwrap()
    }

    fn analyze(source: &str) -> Vec<Finding> {
        analyze_with_address(source, None)
    }

    #[test]
    fn test_foreign_address_is_medium() {
        let findings = analyze(
            "contract T { address dev = 0xAbCd111122223333444455556666777788889999; }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Hardcoded Address");
        assert_eq!(findings[0].severity, Severity::Medium);
        assert!(findings[0].explanation.contains("1 hardcoded"));
    }

    #[test]
    fn test_own_address_excluded() {
        let findings = analyze_with_address(
            &format!("contract T {{ address self = {OWN}; }}"),
            Some(OWN),
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_private_key_shape_is_critical_and_redacted() {
        let key = format!("0x{}", "ab12".repeat(16));
        let findings = analyze(&format!("contract T {{ bytes32 k = {key}; }}"));
        let f = findings
            .iter()
            .find(|f| f.name == "Hardcoded Private Key")
            .unwrap();
        assert_eq!(f.severity, Severity::Critical);
        assert!(f.code_snippet.is_empty(), "snippet must be redacted");
    }

    #[test]
    fn test_private_key_does_not_double_count_as_address() {
        let key = format!("0x{}", "ab12".repeat(16));
        let findings = analyze(&format!("contract T {{ bytes32 k = {key}; }}"));
        assert!(!findings.iter().any(|f| f.name == "Hardcoded Address"));
    }

    #[test]
    fn test_secret_assignment_is_critical_and_redacted() {
        let findings =
            analyze(r#"contract T { string apiKey = "sk-live-abcdef0123456789"; }"#);
        let f = findings.iter().find(|f| f.name == "Hardcoded Secret").unwrap();
        assert_eq!(f.severity, Severity::Critical);
        assert!(f.code_snippet.is_empty());
    }

    #[test]
    fn test_clean_source_no_findings() {
        assert!(analyze("contract T { address owner; }").is_empty());
    }
}
