use anyhow::Result;

use super::context::AuditContext;
use crate::finding::{Confidence, Finding, Severity};

/// Core trait for all audit detectors.
/// Implementors inspect one contract and return findings for a single
/// vulnerability class. Detectors are pure over the context: no I/O, no
/// shared mutable state, no dependence on execution order.
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector (e.g., "uncapped-minting")
    fn name(&self) -> &str;

    /// Human-readable description of what this detector checks
    fn description(&self) -> &str;

    /// Default severity of findings from this detector
    fn severity(&self) -> Severity;

    /// Default confidence level of findings from this detector
    fn confidence(&self) -> Confidence;

    /// Run detection on the given audit context, return findings.
    /// An Err is isolated by the registry: it is logged and contributes
    /// zero findings, never aborting the rest of the audit.
    fn detect(&self, context: &AuditContext) -> Result<Vec<Finding>>;
}
