use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Grades the contract's transfer tax by the largest `<name>Fee = N` /
/// `<name>Tax = N` assignment found in the source.
///
/// Up to 5% passes silently. Above 20% the fee is treated as confiscatory
/// unless a legitimate-fee-use context (liquidity/marketing/charity/
/// development/ecosystem) appears in the source.
pub struct TransactionTax;

const LEGITIMATE_USE: &[&str] = &[
    "liquidity",
    "marketing",
    "charity",
    "development",
    "ecosystem",
];

fn fee_assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[a-z0-9_]*(?:fee|tax)\s*=\s*([0-9]+)\b").unwrap())
}

impl Detector for TransactionTax {
    fn name(&self) -> &str {
        "transaction-tax"
    }

    fn description(&self) -> &str {
        "Grades transfer fee/tax assignments by their largest configured rate"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn detect(&self, ctx: &AuditContext) -> Result<Vec<Finding>> {
        let source = ctx.source();

        let mut max: u64 = 0;
        let mut max_at: Option<(usize, usize)> = None;
        for caps in fee_assign_re().captures_iter(source.as_str()) {
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(value) = digits.as_str().parse::<u64>() else {
                continue;
            };
            if value > max {
                max = value;
                max_at = Some((whole.start(), whole.len()));
            }
        }

        let Some((pos, len)) = max_at else {
            return Ok(Vec::new());
        };
        if max <= 5 {
            return Ok(Vec::new());
        }

        let (name, severity) = if max <= 10 {
            ("Moderate Transaction Fee", Severity::Medium)
        } else if max <= 20 {
            ("High Transaction Fee", Severity::Medium)
        } else if source.contains_any(LEGITIMATE_USE) {
            ("Excessive Transaction Fee", Severity::High)
        } else {
            ("Excessive Transaction Fee", Severity::Critical)
        };

        Ok(vec![Finding::new(
            self.name(),
            name,
            severity,
            self.confidence(),
            snippet::extract_at(source.as_str(), pos, len),
            format!("The largest configured transfer fee or tax is {max}%."),
            "Every transfer silently forfeits part of its amount; at high rates \
             this is equivalent to blocking sells.",
            "Keep total fees in the low single digits and document where the \
             proceeds go.",
        )])
    }
}
