use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::{guard, snippet};

/// Detects honeypot-style trading toggles: a trading-enabled flag with no
/// launch-time bound, and anti-bot machinery with no sunset.
pub struct TradingRestrictions;

const TRADING_SWITCH: &[&str] = &[
    "tradingenabled",
    "tradingactive",
    "tradingopen",
    "tradingallowed",
    "cantrade",
];
const LAUNCH_BOUND: &[&str] = &[
    "launchtime",
    "launchedat",
    "launchblock",
    "tradingstarttime",
    "listingtime",
];

const ANTI_BOT: &[&str] = &["antibot", "anti-bot", "botprotection", "sniperprotection"];
const SUNSET: &[&str] = &["duration", "deadline", "cooldown", "endtime", "sunset"];

impl Detector for TradingRestrictions {
    fn name(&self) -> &str {
        "trading-restrictions"
    }

    fn description(&self) -> &str {
        "Detects trading on/off switches and anti-bot machinery without time bounds"
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

        if let Some(matched) = guard::first_match(source, TRADING_SWITCH) {
            let time_bound = source.contains_any(LAUNCH_BOUND);
            let (name, severity) = if time_bound {
                ("Temporary Trading Restriction", Severity::Medium)
            } else {
                ("Trading Restriction Switch", Severity::High)
            };
            findings.push(Finding::new(
                self.name(),
                name,
                severity,
                self.confidence(),
                snippet::extract(source, matched),
                if time_bound {
                    "Trading is gated behind a flag that is tied to a launch-time \
                     bound."
                } else {
                    "Trading is gated behind a flag with no launch-time bound; it can \
                     be turned off again at any point."
                },
                "While the flag is off, holders cannot sell; this is the core honeypot \
                 mechanic.",
                "Make enabling trading one-way, or bind the restriction to a fixed \
                 launch window.",
            ));
        }

        if let Some(matched) = guard::first_match(source, ANTI_BOT) {
            let sunset = source.contains_any(SUNSET);
            let (name, severity) = if sunset {
                ("Time-Limited Anti-Bot Mechanism", Severity::Low)
            } else {
                ("Anti-Bot Mechanism", Severity::Medium)
            };
            findings.push(Finding::new(
                self.name(),
                name,
                severity,
                Confidence::Medium,
                snippet::extract(source, matched),
                "The contract carries anti-bot transfer machinery.",
                "Anti-bot checks double as arbitrary transfer restrictions if they \
                 never expire.",
                "Give bot protection an explicit sunset after launch.",
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
        TradingRestrictions.detect(&ctx).unwrap()
    }

    #[test]
    fn test_unbounded_trading_switch_is_high() {
        let findings = analyze(
            "contract T { bool public tradingEnabled; function setTrading(bool on) public onlyOwner { tradingEnabled = on; } }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Trading Restriction Switch");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_launch_bound_downgrades() {
        let findings = analyze(
            "contract T { bool public tradingEnabled; uint256 public launchTime; }",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Temporary Trading Restriction");
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_antibot_without_sunset_is_medium() {
        let findings = analyze("contract T { bool public antiBotEnabled; }");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Anti-Bot Mechanism");
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_antibot_with_sunset_is_low() {
        let findings =
            analyze("contract T { bool public antiBot; uint256 public antiBotDuration; }");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "Time-Limited Anti-Bot Mechanism");
        assert_eq!(findings[0].severity, Severity::Low);
    }

    #[test]
    fn test_plain_token_no_findings() {
        let findings = analyze("contract T { mapping(address => uint256) balances; }");
        assert!(findings.is_empty());
    }
}
