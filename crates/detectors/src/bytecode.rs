use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;

/// Heuristics over the deployed bytecode rather than the source.
///
/// Runs only when bytecode was actually fetched: an absent value means the
/// family was skipped, and the report must not fabricate a "checked and
/// clean" impression for it.
pub struct BytecodeHeuristics;

/// Deployed runtime bytecode below this length is a forwarding stub, not a
/// token implementation.
const MIN_DEPLOYED_LEN: usize = 120;

/// The delegate-forwarding stub sequence (calldatacopy + delegatecall
/// setup). Its presence in bytecode whose source shows no `assembly` block
/// means the deployed code does something the verified source does not.
const FORWARDING_STUB: &str = "363d3d373d3d3d363d73";

impl Detector for BytecodeHeuristics {
    fn name(&self) -> &str {
        "bytecode-heuristics"
    }

    fn description(&self) -> &str {
        "Detects empty deployments, proxy-sized bytecode, and hidden assembly"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let Some(bytecode) = ctx.bytecode() else {
            return Ok(Vec::new());
        };
        let bytecode = bytecode.to_ascii_lowercase();
        let source = ctx.source();

        if bytecode.is_empty() || bytecode == "0x" {
            // Nothing lives at the address; all further bytecode checks are
            // meaningless.
            return Ok(vec![Finding::new(
                self.name(),
                "Contract Not Deployed or Self-Destructed",
                Severity::Critical,
                Confidence::High,
                "",
                "The address holds no bytecode: the contract was never deployed \
                 here, or it has self-destructed.",
                "Any interaction with this address sends funds into a void.",
                "Verify the address, and treat previously deployed contracts that \
                 now read empty as destroyed.",
            )]);
        }

        let mut findings = Vec::new();

        if bytecode.len() < MIN_DEPLOYED_LEN && !source.contains("selfdestruct") {
            findings.push(Finding::new(
                self.name(),
                "Minimal Bytecode (Possible Proxy)",
                Severity::Informational,
                Confidence::Low,
                "",
                "The deployed bytecode is far smaller than a token implementation; \
                 the address likely forwards to another contract.",
                "The audited source may not be the code that actually executes.",
                "Resolve the implementation address and audit that contract \
                 instead.",
            ));
        }

        if bytecode.contains(FORWARDING_STUB) && !source.contains("assembly") {
            findings.push(Finding::new(
                self.name(),
                "Hidden Assembly Fingerprint",
                Severity::High,
                Confidence::Medium,
                "",
                "The bytecode contains a delegate-forwarding stub, but the verified \
                 source shows no assembly block that would produce it.",
                "Execution is redirected somewhere the published source does not \
                 disclose.",
                "Treat the verification as unreliable and audit the bytecode-level \
                 behavior.",
            ));
        }

        Ok(findings)
    }
}
