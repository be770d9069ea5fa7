use chrono::{DateTime, Utc};
use serde::Serialize;

use super::scoring::{severity_counts, trust_score};
use crate::detector::DetectorDiagnostic;
use crate::error::FetchFailure;
use crate::finding::{Finding, Severity};
use crate::target::Target;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub moderate: usize,
    pub safe: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.critical + self.moderate + self.safe
    }
}

/// Immutable result of one scan. `score` and `counts` are always derived
/// from `findings`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    score: u8,
    findings: Vec<Finding>,
    counts: SeverityCounts,
    timestamp: DateTime<Utc>,
    target: Option<Target>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<DetectorDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_digest: Option<String>,
}

impl DetectionReport {
    /// Build a report; an empty finding list gets the implicit safe entry.
    pub fn from_findings(
        mut findings: Vec<Finding>,
        diagnostics: Vec<DetectorDiagnostic>,
        target: Option<Target>,
        page_digest: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        if findings.is_empty() {
            findings.push(Finding::no_issues(timestamp));
        }
        Self {
            score: trust_score(&findings),
            counts: severity_counts(&findings),
            findings,
            timestamp,
            target,
            diagnostics,
            page_digest,
        }
    }

    /// Degraded report for a scan whose page could not be loaded: score 0,
    /// one critical finding describing the failure.
    pub fn fetch_failure(
        target: Option<Target>,
        failure: &FetchFailure,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::from_findings(
            vec![Finding::fetch_failure(failure, timestamp)],
            Vec::new(),
            target,
            None,
            timestamp,
        )
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn diagnostics(&self) -> &[DetectorDiagnostic] {
        &self.diagnostics
    }

    pub fn page_digest(&self) -> Option<&str> {
        self.page_digest.as_deref()
    }

    /// True when the page could not be fetched.
    pub fn is_degraded(&self) -> bool {
        self.findings.iter().any(|f| f.detector == "fetch")
    }

    pub fn has_critical(&self) -> bool {
        self.counts.critical > 0
    }

    /// Findings that are actual signals, i.e. without the implicit safe entry.
    pub fn issues(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity != Severity::Safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::NO_ISSUES_TITLE;

    #[test]
    fn test_empty_report_has_implicit_safe_entry() {
        let report = DetectionReport::from_findings(Vec::new(), Vec::new(), None, None, Utc::now());
        assert_eq!(report.score(), 100);
        assert_eq!(report.findings().len(), 1);
        assert_eq!(report.findings()[0].title, NO_ISSUES_TITLE);
        assert_eq!(report.counts().safe, 1);
        assert_eq!(report.issues().count(), 0);
    }

    #[test]
    fn test_fetch_failure_report() {
        let failure = FetchFailure::Network("connection refused".to_string());
        let report =
            DetectionReport::fetch_failure(Some(Target::new("example.test")), &failure, Utc::now());
        assert_eq!(report.score(), 0);
        assert_eq!(report.findings().len(), 1);
        assert_eq!(report.counts().critical, 1);
        assert!(report.is_degraded());
        assert!(report.findings()[0].summary.contains("connection refused"));
        assert_eq!(report.target().map(|t| t.as_str()), Some("example.test"));
    }

    #[test]
    fn test_serialized_shape() {
        let report = DetectionReport::from_findings(Vec::new(), Vec::new(), None, None, Utc::now());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 100);
        assert_eq!(json["counts"]["safe"], 1);
        assert!(json.get("diagnostics").is_none());
        assert!(json.get("pageDigest").is_none());
    }
}
