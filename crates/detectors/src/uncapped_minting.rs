use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::{guard, snippet};

/// Detects minting that no supply cap constrains.
///
/// A `mint` function with no cap check anywhere in the contract is Critical;
/// if the function at least sits behind an access-control guard, the finding
/// downgrades to the "with access controls" variant. A minting on/off flag
/// with no cap nearby is reported separately.
pub struct UncappedMinting;

const SUPPLY_CAP: &[&str] = &[
    "maxsupply",
    "max_supply",
    "supplycap",
    "maxtotalsupply",
    "hardcap",
];
const ACCESS_GUARD: &[&str] = &["require", "onlyowner", "onlyminter", "onlyrole"];
const MINT_SWITCH: &[&str] = &[
    "mintingfinished",
    "mintingenabled",
    "finishminting",
    "mintdisabled",
];

impl Detector for UncappedMinting {
    fn name(&self) -> &str {
        "uncapped-minting"
    }

    fn description(&self) -> &str {
        "Detects mint functions and mint switches with no supply cap"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        if source.contains_any(SUPPLY_CAP) {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();

        if let Some(mint) = ctx.functions().iter().find(|f| f.name_is("mint")) {
            let code_snippet =
                snippet::extract_at(source.as_str(), mint.start, mint.text.len().min(80));
            // Modifiers live in the signature, so the guard check covers the
            // whole definition, not just the body.
            let finding = if mint.text_contains_any(ACCESS_GUARD) {
                Finding::new(
                    self.name(),
                    "Uncapped Minting with Access Controls",
                    Severity::Medium,
                    self.confidence(),
                    code_snippet,
                    "The mint function is access-controlled, but no maximum supply \
                     constrains how much it can create.",
                    "The privileged minter can dilute every holder without bound.",
                    "Enforce a maximum supply in the mint path, e.g. \
                     `require(totalSupply + amount <= MAX_SUPPLY)`.",
                )
            } else {
                Finding::new(
                    self.name(),
                    "Unlimited Minting",
                    Severity::Critical,
                    self.confidence(),
                    code_snippet,
                    "The mint function has neither a supply cap nor an access-control \
                     guard.",
                    "Anyone can mint arbitrary amounts and collapse the token's value \
                     instantly.",
                    "Restrict minting to an authorized role and enforce a maximum \
                     supply.",
                )
            };
            findings.push(finding);
        }

        if let Some(matched) = guard::first_match(source, MINT_SWITCH) {
            findings.push(Finding::new(
                self.name(),
                "Mint-Disable Switch",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract(source, matched),
                "Minting is controlled by an on/off flag and no supply-cap constant \
                 exists to bound it while enabled.",
                "The flag can be flipped back on at any time, so \"minting finished\" \
                 is not a durable guarantee.",
                "Replace the flag with a hard supply cap, or make disabling minting \
                 irreversible.",
            ));
        }

        Ok(findings)
    }
}
