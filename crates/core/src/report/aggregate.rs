//! The aggregation pass: dedup + sort + cap.

use crate::finding::Finding;
use crate::pattern::snippet::dedup_prefix;

/// Default bound on report size.
pub const DEFAULT_MAX_FINDINGS: usize = 10;

/// Merge raw detector output into the final bounded report body.
///
/// 1. Stable-sort by severity rank (Critical first). Stability matters: two
///    findings of equal severity keep their detector-registration order.
/// 2. Dedup on `name + first 100 chars of the collapsed snippet`; the first
///    (highest-severity) instance of a repeated key wins.
/// 3. Truncate to `max_findings`.
pub fn aggregate(mut findings: Vec<Finding>, max_findings: usize) -> Vec<Finding> {
    findings.sort_by(|a, b| a.severity.cmp(&b.severity));

    let mut seen = std::collections::HashSet::new();
    findings.retain(|f| seen.insert(dedup_key(f)));

    findings.truncate(max_findings);
    findings
}

fn dedup_key(finding: &Finding) -> String {
    format!("{}{}", finding.name, dedup_prefix(&finding.code_snippet))
}
