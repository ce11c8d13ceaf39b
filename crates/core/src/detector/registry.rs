use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;

use super::context::AuditContext;
use super::traits::Detector;
use crate::finding::{Finding, Severity};

/// Registry that holds all detectors and fans them out over a contract.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Register a detector
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Register multiple detectors at once
    pub fn register_all(&mut self, detectors: Vec<Box<dyn Detector>>) {
        self.detectors.extend(detectors);
    }

    /// Run every registered detector against the context and merge their
    /// findings in registration order.
    ///
    /// Detectors are pure over an immutable context, so the fan-out runs on
    /// the rayon pool with no synchronization beyond the final collect;
    /// `par_iter` preserves index order, keeping reports deterministic.
    /// Each invocation is isolated: an Err or a panic inside one detector is
    /// logged and contributes zero findings instead of aborting the batch.
    pub fn run_all(&self, context: &AuditContext) -> Vec<Finding> {
        self.detectors
            .par_iter()
            .map(|d| run_isolated(d.as_ref(), context))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Run only detectors matching the given names
    pub fn run_selected(&self, names: &[&str], context: &AuditContext) -> Vec<Finding> {
        self.detectors
            .par_iter()
            .filter(|d| names.contains(&d.name()))
            .map(|d| run_isolated(d.as_ref(), context))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// List all registered detector names
    pub fn list_detectors(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Filter findings by minimum severity
    pub fn filter_by_severity(findings: Vec<Finding>, min: &Severity) -> Vec<Finding> {
        findings
            .into_iter()
            .filter(|f| f.severity <= *min)
            .collect()
    }
}

fn run_isolated(detector: &dyn Detector, context: &AuditContext) -> Vec<Finding> {
    match catch_unwind(AssertUnwindSafe(|| detector.detect(context))) {
        Ok(Ok(findings)) => findings,
        Ok(Err(e)) => {
            eprintln!("detector {} failed: {e}", detector.name());
            Vec::new()
        }
        Err(_) => {
            eprintln!("detector {} panicked", detector.name());
            Vec::new()
        }
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
