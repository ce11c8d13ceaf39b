//! Orchestration: fan out to every detector, aggregate, report.

use crate::detector::{AuditContext, DetectorRegistry};
use crate::report::{aggregate, AuditReport, DEFAULT_MAX_FINDINGS};

/// Runs the full detector battery over one audit context and folds the raw
/// findings through the aggregation pass. The engine does no I/O: source,
/// tree, and bytecode are already resident in the context, and callers are
/// responsible for validating the source precondition
/// (`source::validate_source`) before invoking it.
pub struct AuditEngine {
    registry: DetectorRegistry,
    max_findings: usize,
}

impl AuditEngine {
    pub fn new(registry: DetectorRegistry) -> Self {
        Self {
            registry,
            max_findings: DEFAULT_MAX_FINDINGS,
        }
    }

    pub fn with_max_findings(mut self, max_findings: usize) -> Self {
        self.max_findings = max_findings;
        self
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn audit(&self, context: &AuditContext) -> AuditReport {
        let raw = self.registry.run_all(context);
        let findings = aggregate(raw, self.max_findings);
        AuditReport::from_findings(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;
    use crate::finding::{Confidence, Finding, Severity};
    use crate::source::SourceText;

    struct NoisyDetector;

    impl Detector for NoisyDetector {
        fn name(&self) -> &str {
            "noisy"
        }
        fn description(&self) -> &str {
            "Emits more findings than the cap"
        }
        fn severity(&self) -> Severity {
            Severity::Low
        }
        fn confidence(&self) -> Confidence {
            Confidence::Low
        }
        fn detect(&self, _ctx: &AuditContext) -> anyhow::Result<Vec<Finding>> {
            Ok((0..30)
                .map(|i| {
                    Finding::new(
                        self.name(),
                        format!("Finding {i}"),
                        if i % 2 == 0 { Severity::High } else { Severity::Low },
                        Confidence::Low,
                        format!("site {i}"),
                        "e",
                        "i",
                        "r",
                    )
                })
                .collect())
        }
    }

    #[test]
    fn test_audit_caps_and_orders() {
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(NoisyDetector));
        let engine = AuditEngine::new(registry);

        let source = SourceText::new("contract T {}".to_string());
        let ctx = AuditContext::new(&source, None, None, None);
        let report = engine.audit(&ctx);

        assert_eq!(report.total_findings, DEFAULT_MAX_FINDINGS);
        for pair in report.findings.windows(2) {
            assert!(pair[0].severity <= pair[1].severity);
        }
    }

    #[test]
    fn test_max_findings_override() {
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(NoisyDetector));
        let engine = AuditEngine::new(registry).with_max_findings(3);

        let source = SourceText::new("contract T {}".to_string());
        let ctx = AuditContext::new(&source, None, None, None);
        assert_eq!(engine.audit(&ctx).total_findings, 3);
    }
}
