use super::context::ScanContext;
use super::key::DetectorKey;
use crate::finding::{Finding, Severity};

/// Core trait for all dark-pattern detectors.
/// Implementors inspect a page snapshot and return findings; they never mutate it.
pub trait Detector: Send + Sync {
    /// Catalog key, also the config toggle name (e.g. "prechecked")
    fn key(&self) -> DetectorKey;

    /// Finding type reported by this detector (e.g. "Pre-checked checkbox")
    fn name(&self) -> &str;

    /// Human-readable description of what this detector checks
    fn description(&self) -> &str;

    /// Fixed severity of every finding from this detector
    fn severity(&self) -> Severity;

    /// Score change applied per finding, never positive
    fn score_delta(&self) -> i32;

    /// Run detection on the given scan context, return findings
    fn detect(&self, ctx: &ScanContext) -> Vec<Finding>;

    /// Disabled detectors return nothing without looking at the page.
    fn evaluate(&self, ctx: &ScanContext, enabled: bool) -> Vec<Finding> {
        if !enabled {
            return Vec::new();
        }
        self.detect(ctx)
    }
}
