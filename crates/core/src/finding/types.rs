use serde::Serialize;

/// Severity levels ordered from most to least severe.
/// IMPORTANT: Variant order matters — derived Ord puts Critical < High < Medium
/// < Low < Informational, which is used both for ranking reports (sort
/// ascending, Critical first) and for filtering (retain findings where
/// severity <= threshold). Do NOT reorder these variants.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Informational,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
            Severity::Informational => write!(f, "Informational"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// One reported issue. Immutable once produced — detectors never mutate
/// shared state and never see each other's output.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub detector_name: String,
    /// Short title identifying the issue class. Not unique across audits;
    /// forms the dedup key together with the snippet prefix.
    pub name: String,
    pub severity: Severity,
    pub confidence: Confidence,
    /// Bounded excerpt of the offending source. Empty for bytecode-only
    /// findings and for findings whose snippet is redacted.
    pub code_snippet: String,
    pub explanation: String,
    pub impact: String,
    pub recommendation: String,
}

impl Finding {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        detector_name: &str,
        name: impl Into<String>,
        severity: Severity,
        confidence: Confidence,
        code_snippet: impl Into<String>,
        explanation: impl Into<String>,
        impact: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            detector_name: detector_name.to_string(),
            name: name.into(),
            severity,
            confidence,
            code_snippet: code_snippet.into(),
            explanation: explanation.into(),
            impact: impact.into(),
            recommendation: recommendation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
        assert!(Severity::Low < Severity::Informational);
    }

    #[test]
    fn test_threshold_filtering_keeps_more_severe() {
        // severity <= threshold retains everything at least as severe
        let threshold = Severity::Medium;
        assert!(Severity::Critical <= threshold);
        assert!(Severity::High <= threshold);
        assert!(Severity::Medium <= threshold);
        assert!(Severity::Low > threshold);
    }
}
