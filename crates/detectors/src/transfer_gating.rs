use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;
use solguard::source::FunctionDef;

/// Detects transfer paths that treat senders unequally: whitelist gates and
/// owner-equality branches inside transfer logic.
pub struct TransferGating;

const TRANSFER_FNS: &[&str] = &["transfer", "transferfrom", "_transfer"];
const WHITELIST: &[&str] = &["whitelist", "iswhitelisted", "onlywhitelisted"];
const PRESALE_CONTEXT: &[&str] = &["presale", "ico", "launch", "antibot", "anti-bot"];
const OWNER_BRANCH: &[&str] = &[
    "msg.sender == owner",
    "sender == owner",
    "from == owner",
    "== owner()",
];
const FEE_EXEMPT_CONTEXT: &[&str] = &["feeexempt", "excludedfromfee", "isexcluded"];

fn transfer_functions<'c>(ctx: &'c AuditContext) -> impl Iterator<Item = &'c FunctionDef> {
    ctx.functions().iter().filter(|f| f.name_in(TRANSFER_FNS))
}

impl Detector for TransferGating {
    fn name(&self) -> &str {
        "transfer-gating"
    }

    fn description(&self) -> &str {
        "Detects whitelist gates and owner-special branches in transfer logic"
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

        if let Some(func) = transfer_functions(ctx).find(|f| f.text_contains_any(WHITELIST)) {
            let severity = if source.contains_any(PRESALE_CONTEXT) {
                Severity::Medium
            } else {
                Severity::High
            };
            findings.push(Finding::new(
                self.name(),
                "Transfer Whitelist Restriction",
                severity,
                self.confidence(),
                snippet::extract_at(source.as_str(), func.start, func.text.len().min(80)),
                format!(
                    "Transfers in `{}` are gated on a whitelist.",
                    func.name
                ),
                "Anyone not on the list cannot move tokens; the list owner decides \
                 who may sell.",
                "Drop the whitelist from the transfer path, or bound it to a \
                 documented presale phase.",
            ));
        }

        if let Some(func) = transfer_functions(ctx).find(|f| f.body_contains_any(OWNER_BRANCH)) {
            let severity = if source.contains_any(FEE_EXEMPT_CONTEXT) {
                Severity::Medium
            } else {
                Severity::High
            };
            findings.push(Finding::new(
                self.name(),
                "Owner-Privileged Transfer Logic",
                severity,
                self.confidence(),
                snippet::extract_at(source.as_str(), func.start, func.text.len().min(80)),
                format!(
                    "`{}` branches on whether a party is the owner, so transfers \
                     follow different rules for the owner than for everyone else.",
                    func.name
                ),
                "Owner-special paths commonly waive fees or limits for the owner \
                 while holders pay full freight, and can conceal sell restrictions.",
                "Apply identical transfer rules to all parties, or document the \
                 exemption as a fee-exclusion list.",
            ));
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
        TransferGating.detect(&ctx).unwrap()
    }

    #[test]
    fn test_whitelisted_transfer_is_high() {
        let findings = analyze(
            "contract T { function transfer(address to, uint256 v) public { require(whitelist[msg.sender]); } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Transfer Whitelist Restriction");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_presale_framing_downgrades_whitelist() {
        let findings = analyze(
            "contract T { // presale allocation list\n function transfer(address to, uint256 v) public { require(whitelist[msg.sender]); } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_owner_branch_in_transfer() {
        let findings = analyze(
            "contract T { function _transfer(address from, address to, uint256 v) internal { if (from == owner) { super._transfer(from, to, v); return; } } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Owner-Privileged Transfer Logic");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_fee_exemption_framing_downgrades_owner_branch() {
        let findings = analyze(
            "contract T { mapping(address => bool) public excludedFromFee; \
             function _transfer(address from, address to, uint256 v) internal { if (from == owner) { return; } } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_whitelist_outside_transfer_not_flagged() {
        let findings = analyze(
            "contract T { mapping(address => bool) public whitelist; \
             function claim() public { require(whitelist[msg.sender]); } }",
        );
        assert!(findings.is_empty());
    }
}
