use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, warn};

use super::context::ScanContext;
use super::key::DetectorKey;
use super::traits::Detector;
use crate::config::DetectorConfig;
use crate::finding::Finding;

/// A detector that failed mid-evaluation; it contributed no findings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DetectorDiagnostic {
    pub detector: String,
    pub message: String,
}

/// Output of one registry pass.
#[derive(Debug, Default)]
pub struct DetectorRun {
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<DetectorDiagnostic>,
}

/// Registry that holds all detectors and runs them against page snapshots.
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
        self.detectors.sort_by_key(|d| d.key());
    }

    /// Register multiple detectors at once
    pub fn register_all(&mut self, detectors: Vec<Box<dyn Detector>>) {
        self.detectors.extend(detectors);
        self.detectors.sort_by_key(|d| d.key());
    }

    /// Run every registered detector in catalog order.
    /// A detector that panics is contained: it yields no findings and a diagnostic.
    pub fn run_all(&self, ctx: &ScanContext, config: &DetectorConfig) -> DetectorRun {
        let mut run = DetectorRun::default();

        for detector in &self.detectors {
            let key = detector.key();
            let enabled = config.is_enabled(key);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| detector.evaluate(ctx, enabled)));

            match outcome {
                Ok(findings) => {
                    debug!(detector = %key, enabled, findings = findings.len(), "detector finished");
                    run.findings.extend(findings);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(detector = %key, %message, "detector failed; its findings are dropped");
                    run.diagnostics.push(DetectorDiagnostic {
                        detector: key.as_str().to_string(),
                        message,
                    });
                }
            }
        }

        run
    }

    /// List all registered detector keys
    pub fn list_detectors(&self) -> Vec<DetectorKey> {
        self.detectors.iter().map(|d| d.key()).collect()
    }

    pub fn get(&self, key: DetectorKey) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.key() == key)
            .map(|d| d.as_ref())
    }

    pub fn detectors(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
