use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Detects functions that can end or drain the contract: `selfdestruct`
/// reachable without guards, and emergency-withdrawal entry points without
/// time-lock or multi-approval safeguards.
pub struct DangerousFunctions;

const DESTRUCT: &[&str] = &["selfdestruct", "suicide"];
const ACCESS_GUARD: &[&str] = &["onlyowner", "require", "modifier", "onlyrole"];
const EMERGENCY_NAMES: &[&str] = &["emergencywithdraw", "withdrawall", "rescuetokens"];
const EMERGENCY_SAFEGUARDS: &[&str] = &["timelock", "multisig", "multi-approval", "multiapproval"];
const EMERGENCY_GUARD: &[&str] = &["onlyowner", "require", "onlyrole"];

impl Detector for DangerousFunctions {
    fn name(&self) -> &str {
        "dangerous-functions"
    }

    fn description(&self) -> &str {
        "Detects unprotected selfdestruct and unsafeguarded emergency withdrawals"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();
        let mut findings = Vec::new();

        let mut destruct_seen_in_fn = false;
        for func in ctx.functions() {
            if func.body_contains_any(DESTRUCT) {
                destruct_seen_in_fn = true;
                let code_snippet =
                    snippet::extract_at(source.as_str(), func.start, func.text.len().min(80));
                if !func.text_contains_any(ACCESS_GUARD) {
                    findings.push(Finding::new(
                        self.name(),
                        "Critical Risk: Unprotected Self-Destruct",
                        Severity::Critical,
                        Confidence::High,
                        code_snippet,
                        format!(
                            "`{}` can selfdestruct the contract and carries no access \
                             control at all.",
                            func.name
                        ),
                        "Anyone can destroy the contract and strand every holder's \
                         balance permanently.",
                        "Remove selfdestruct, or at minimum gate it behind an \
                         authorized role and a time-lock.",
                    ));
                } else if !source.contains("timelock") {
                    findings.push(Finding::new(
                        self.name(),
                        "Self-Destruct Without Time-Lock",
                        Severity::High,
                        Confidence::High,
                        code_snippet,
                        format!(
                            "`{}` can selfdestruct the contract; it is access-gated \
                             but nothing delays execution.",
                            func.name
                        ),
                        "A single privileged key can kill the contract with no \
                         warning to holders.",
                        "Route destruction through a time-lock so holders can exit \
                         first.",
                    ));
                }
            }

            if func.name_in(EMERGENCY_NAMES) && !source.contains_any(EMERGENCY_SAFEGUARDS) {
                let code_snippet =
                    snippet::extract_at(source.as_str(), func.start, func.text.len().min(80));
                if !func.text_contains_any(EMERGENCY_GUARD) {
                    findings.push(Finding::new(
                        self.name(),
                        "Unprotected Emergency Withdrawal",
                        Severity::Critical,
                        Confidence::High,
                        code_snippet,
                        format!(
                            "`{}` drains contract funds and has neither an access \
                             guard nor a time-lock or multi-approval safeguard.",
                            func.name
                        ),
                        "Anyone can empty the contract.",
                        "Gate emergency withdrawals behind an authorized role plus a \
                         time-lock or multi-approval scheme.",
                    ));
                } else {
                    findings.push(Finding::new(
                        self.name(),
                        "Emergency Withdrawal Function",
                        Severity::Medium,
                        Confidence::Medium,
                        code_snippet,
                        format!(
                            "`{}` lets a privileged caller drain funds with no \
                             time-lock or multi-approval safeguard.",
                            func.name
                        ),
                        "One key controls all pooled funds.",
                        "Add a time-lock or multi-approval requirement to the \
                         emergency path.",
                    ));
                }
            }
        }

        // selfdestruct outside any recognizable function (mangled source or
        // assembly block) is treated as unprotected.
        if !destruct_seen_in_fn {
            if let Some(matched) = DESTRUCT.iter().find(|p| source.contains(p)) {
                findings.push(Finding::new(
                    self.name(),
                    "Critical Risk: Unprotected Self-Destruct",
                    Severity::Critical,
                    Confidence::Medium,
                    snippet::extract(source, matched),
                    "A selfdestruct call appears outside any function the analyzer \
                     could delimit, so no guard can be confirmed.",
                    "The contract may be destroyable by anyone.",
                    "Remove selfdestruct, or gate it behind an authorized role and \
                     a time-lock.",
                ));
            }
        }

        Ok(findings)
    }
}
