use chrono::{DateTime, Utc};
use darkux_guard::config::{apply_suppressions, DetectorConfig, SuppressionConfig};
use darkux_guard::detector::{DetectorRegistry, ScanContext};
use darkux_guard::page::PageModel;
use darkux_guard::report::DetectionReport;
use darkux_guard::{FetchFailure, Target};
use tracing::{debug, info, trace};

use crate::all_detectors;

/// Runs the registered detectors over one page snapshot and folds the
/// findings into a report. Holds no per-scan state, so one engine can serve
/// any number of scans.
pub struct DetectionEngine {
    registry: DetectorRegistry,
    config: DetectorConfig,
    suppressions: SuppressionConfig,
}

impl DetectionEngine {
    /// Engine with every built-in detector.
    pub fn new(config: DetectorConfig) -> Self {
        let mut registry = DetectorRegistry::new();
        registry.register_all(all_detectors());
        Self::with_registry(registry, config)
    }

    pub fn with_registry(registry: DetectorRegistry, config: DetectorConfig) -> Self {
        Self {
            registry,
            config,
            suppressions: SuppressionConfig::default(),
        }
    }

    pub fn with_suppressions(mut self, suppressions: SuppressionConfig) -> Self {
        self.suppressions = suppressions;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn run(&self, target: Option<&Target>, page: &PageModel) -> DetectionReport {
        self.run_at(target, page, Utc::now())
    }

    /// Same as [`DetectionEngine::run`] with a fixed timestamp; equal inputs
    /// give equal reports.
    pub fn run_at(
        &self,
        target: Option<&Target>,
        page: &PageModel,
        timestamp: DateTime<Utc>,
    ) -> DetectionReport {
        let ctx = ScanContext::new(page, timestamp);
        let run = self.registry.run_all(&ctx, &self.config);

        let raw = run.findings.len();
        let findings = apply_suppressions(run.findings, page, &self.suppressions);
        if findings.len() < raw {
            debug!(suppressed = raw - findings.len(), "findings suppressed");
        }
        for finding in &findings {
            trace!(%finding, "finding");
        }

        let report = DetectionReport::from_findings(
            findings,
            run.diagnostics,
            target.cloned(),
            Some(page.fingerprint()),
            timestamp,
        );
        info!(
            page = target.map(Target::as_str).unwrap_or("-"),
            score = report.score(),
            critical = report.counts().critical,
            moderate = report.counts().moderate,
            "scan complete"
        );
        report
    }

    /// Degraded report for a page that could not be loaded.
    pub fn failure_report(&self, target: Option<&Target>, failure: &FetchFailure) -> DetectionReport {
        DetectionReport::fetch_failure(target.cloned(), failure, Utc::now())
    }
}

/// One-shot detection with the built-in catalog.
pub fn run_detection(page: &PageModel, config: &DetectorConfig) -> DetectionReport {
    DetectionEngine::new(config.clone()).run(None, page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkux_guard::detector::{Detector, DetectorKey};
    use darkux_guard::finding::*;
    use darkux_guard::page::ElementView;

    struct Exploding;

    impl Detector for Exploding {
        fn key(&self) -> DetectorKey {
            DetectorKey::Scarcity
        }
        fn name(&self) -> &str {
            "Scarcity tactic"
        }
        fn description(&self) -> &str {
            "always panics"
        }
        fn severity(&self) -> Severity {
            Severity::Moderate
        }
        fn score_delta(&self) -> i32 {
            -15
        }
        fn detect(&self, _ctx: &ScanContext) -> Vec<Finding> {
            panic!("regex blew up")
        }
    }

    #[test]
    fn test_failing_detector_is_isolated() {
        let mut registry = DetectorRegistry::new();
        registry.register(Box::new(Exploding));
        registry.register(Box::new(crate::AutoRenew::default()));
        let engine = DetectionEngine::with_registry(registry, DetectorConfig::all_enabled());

        let page = PageModel::new("Your plan will auto-renew.", Vec::new());
        let report = engine.run(None, &page);

        assert_eq!(report.findings().len(), 1);
        assert_eq!(report.findings()[0].detector, "autorenew");
        assert_eq!(report.diagnostics().len(), 1);
        assert_eq!(report.diagnostics()[0].detector, "scarcity");
        assert_eq!(report.diagnostics()[0].message, "regex blew up");
        assert_eq!(report.score(), 80);
    }

    #[test]
    fn test_inline_suppression_applies() {
        let page = PageModel::new(
            "",
            vec![
                ElementView::new("fieldset").with_attr("data-darkux-ignore", "prechecked"),
                ElementView::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("checked", "")
                    .with_parent(0),
            ],
        );
        let report = DetectionEngine::new(DetectorConfig::default()).run(None, &page);
        assert_eq!(report.score(), 100);
        assert_eq!(report.findings()[0].title, NO_ISSUES_TITLE);
    }

    #[test]
    fn test_locator_suppression_applies() {
        let page = PageModel::new(
            "",
            vec![ElementView::new("input")
                .with_attr("type", "checkbox")
                .with_attr("checked", "")
                .with_attr("id", "cookie-consent")],
        );
        let engine = DetectionEngine::new(DetectorConfig::default()).with_suppressions(
            SuppressionConfig {
                locators: vec!["#cookie-*".to_string()],
            },
        );
        assert_eq!(engine.run(None, &page).score(), 100);
    }

    #[test]
    fn test_failure_report_is_degraded() {
        let engine = DetectionEngine::new(DetectorConfig::default());
        let target = Target::new("shop.test");
        let report = engine.failure_report(Some(&target), &FetchFailure::Blocked { status: 403 });
        assert!(report.is_degraded());
        assert_eq!(report.score(), 0);
        assert_eq!(report.target(), Some(&target));
        assert_eq!(report.page_digest(), None);
    }
}
