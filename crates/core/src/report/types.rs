use serde::Serialize;

use crate::finding::{Finding, Severity};

#[derive(Debug, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub informational: usize,
}

/// The aggregated audit output: ordered (highest severity first),
/// deduplicated, size-bounded. Constructed once per audit invocation and
/// never persisted; the caller owns serialization and storage.
#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub total_findings: usize,
    pub findings_by_severity: SeverityCounts,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let count = |s: Severity| findings.iter().filter(|f| f.severity == s).count();
        let counts = SeverityCounts {
            critical: count(Severity::Critical),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            informational: count(Severity::Informational),
        };
        Self {
            total_findings: findings.len(),
            findings_by_severity: counts,
            findings,
        }
    }
}

/// The record shape the surrounding service maps findings onto. The
/// response's `impact` field carries the severity label and `description`
/// folds explanation, impact, and recommendation into one paragraph.
#[derive(Debug, Serialize)]
pub struct FindingSummary {
    pub title: String,
    pub description: String,
    pub impact: String,
    pub confidence: String,
}

impl From<&Finding> for FindingSummary {
    fn from(f: &Finding) -> Self {
        Self {
            title: f.name.clone(),
            description: format!("{} {} {}", f.explanation, f.impact, f.recommendation),
            impact: f.severity.to_string(),
            confidence: f.confidence.to_string(),
        }
    }
}
