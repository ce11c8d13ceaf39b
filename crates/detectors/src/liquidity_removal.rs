use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::{guard, snippet};

/// Detects DEX liquidity-removal calls without a time-lock. Escalates when
/// the drain path is additionally restricted to an owner/admin role: a
/// privileged actor with an unchecked exit is worse than a public one.
pub struct LiquidityRemoval;

const RISKY: &[&str] = &["removeliquidity"];
const TIME_LOCK: &[&str] = &["timelock", "locktime", "unlocktime", "liquiditylock"];
const PRIVILEGED: &[&str] = &["onlyowner", "onlyadmin"];

impl Detector for LiquidityRemoval {
    fn name(&self) -> &str {
        "liquidity-removal"
    }

    fn description(&self) -> &str {
        "Detects liquidity removal capability that is not time-locked"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        if !guard::risky_without_context(source, RISKY, TIME_LOCK) {
            return Ok(Vec::new());
        }

        let severity = if source.contains_any(PRIVILEGED) {
            Severity::High
        } else {
            Severity::Medium
        };

        Ok(vec![Finding::new(
            self.name(),
            "Liquidity Removal Without Time-Lock",
            severity,
            self.confidence(),
            snippet::extract(source, RISKY[0]),
            "The contract can pull liquidity from the DEX pair and no time-lock \
             constrains when that may happen.",
            "Liquidity can be withdrawn at any moment, leaving holders unable to \
             sell, the standard rug-pull exit.",
            "Lock LP tokens in a time-lock contract or a third-party locker with \
             a published unlock schedule.",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solguard::source::SourceText;

    fn analyze(source: &str) -> Vec<Finding> {
        let source = SourceText::new(source.to_string());
        let ctx = AuditContext::new(&source, None, None, None);
        LiquidityRemoval.detect(&ctx).unwrap()
    }

    #[test]
    fn test_public_removal_is_medium() {
        let findings = analyze(
            "contract T { function exit() public { router.removeLiquidityETH(token, lp, 0, 0, msg.sender, block.timestamp); } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_owner_gated_removal_is_high() {
        let findings = analyze(
            "contract T { function exit() public onlyOwner { router.removeLiquidity(tokenA, tokenB, lp, 0, 0, address(this), deadline); } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_timelock_suppresses() {
        let findings = analyze(
            "contract T { uint256 public liquidityLockExpiry; function exit() public onlyOwner { router.removeLiquidity(a, b, lp, 0, 0, address(this), d); } }",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_no_removal_call_no_finding() {
        let findings = analyze("contract T { function addLiquidity() public {} }");
        assert!(findings.is_empty());
    }
}
