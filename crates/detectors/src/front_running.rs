use anyhow::Result;
use solguard::detector::{AuditContext, Detector};
use solguard::finding::*;
use solguard::pattern::snippet;

/// Front-running exposure: block properties feeding calculations, swap-like
/// functions without slippage guards, and the first-depositor share pattern.
pub struct FrontRunning;

const BLOCK_PROPS: &[&str] = &[
    "block.timestamp",
    "block.number",
    "block.difficulty",
    "block.coinbase",
    "block.gaslimit",
    "block.basefee",
    "blockhash(",
];
const SWAP_NAMES: &[&str] = &["swap", "trade", "buy", "sell"];
const SLIPPAGE_GUARDS: &[&str] = &[
    "deadline",
    "minout",
    "minamount",
    "amountoutmin",
    "minimumout",
    "slippage",
];

fn line_is_calculation(line: &str) -> bool {
    line.contains('%')
        || line.contains('*')
        || line.contains(" + ")
        || line.contains(" - ")
        || line.contains("keccak")
}

impl Detector for FrontRunning {
    fn name(&self) -> &str {
        "front-running"
    }

    fn description(&self) -> &str {
        "Detects block-property calculations, missing slippage guards, and first-depositor risk"
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

        let calc_line = source
            .as_str()
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.starts_with("//") && !l.starts_with('*'))
            .find(|l| {
                let lower = l.to_ascii_lowercase();
                BLOCK_PROPS.iter().any(|p| lower.contains(p)) && line_is_calculation(&lower)
            });
        if let Some(line) = calc_line {
            findings.push(Finding::new(
                self.name(),
                "Block Property Dependence",
                Severity::Medium,
                Confidence::Medium,
                snippet::collapse_whitespace(line),
                "A block property (timestamp, number, difficulty, ...) feeds a \
                 calculation.",
                "Validators influence these values within protocol bounds, skewing \
                 any outcome derived from them, randomness especially.",
                "Use a verifiable randomness source or commit-reveal; never derive \
                 outcomes from block properties.",
            ));
        }

        let swap_fn = ctx.functions().iter().find(|f| {
            SWAP_NAMES.iter().any(|n| f.name_contains(n))
                && !f.name_contains("fee")
                && !f.name.to_ascii_lowercase().starts_with("set")
                && !f.text_contains_any(SLIPPAGE_GUARDS)
        });
        if let Some(func) = swap_fn {
            findings.push(Finding::new(
                self.name(),
                "Missing Slippage Protection",
                Severity::High,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), func.start, func.text.len().min(80)),
                format!(
                    "`{}` executes a trade without a deadline, minimum-output, or \
                     slippage bound.",
                    func.name
                ),
                "Sandwich bots can move the price around the trade and pocket the \
                 difference from the caller.",
                "Add amountOutMin and deadline parameters and enforce them.",
            ));
        }

        let depositor = ctx.functions().iter().find(|f| f.name_contains("deposit"));
        if let Some(func) = depositor.filter(|_| {
            source.contains("totalsupply == 0") || source.contains("totalsupply==0")
        }) {
            findings.push(Finding::new(
                self.name(),
                "First Depositor Advantage",
                Severity::Medium,
                Confidence::Medium,
                snippet::extract_at(source.as_str(), func.start, func.text.len().min(80)),
                "Share accounting special-cases `totalSupply == 0`, the classic \
                 first-depositor setup.",
                "The first depositor can seed a tiny supply, donate to inflate the \
                 share price, and skim subsequent deposits.",
                "Mint dead shares on first deposit or require a minimum initial \
                 deposit.",
            ));
        }

        Ok(findings)
    }
}
