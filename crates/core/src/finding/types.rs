use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FetchFailure;
use crate::page::truncate_chars;

/// Longest summary a finding carries, in characters.
pub const MAX_SUMMARY_CHARS: usize = 140;

/// Title of the synthesized entry in reports without findings.
pub const NO_ISSUES_TITLE: &str = "No issues detected";

/// Title of the single finding in a degraded report.
pub const FETCH_FAILURE_TITLE: &str = "Fetch failure";

/// Severity levels ordered from most to least severe.
/// IMPORTANT: derived Ord puts Critical < Moderate < Safe; reports and
/// filtering rely on it. Do NOT reorder these variants.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Moderate,
    Safe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Moderate => "moderate",
            Severity::Safe => "safe",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::Moderate => write!(f, "Moderate"),
            Severity::Safe => write!(f, "Safe"),
        }
    }
}

/// One concrete dark-pattern signal. Never mutated after a scan produces it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Catalog key of the detector, `fetch` or `none` for synthesized entries.
    pub detector: String,
    #[serde(rename = "type")]
    pub title: String,
    pub severity: Severity,
    pub summary: String,
    pub locator: Option<String>,
    pub score_delta: i32,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
}

impl Finding {
    /// Positive deltas are clamped to zero: findings only ever lower the score.
    pub fn new(
        detector: &str,
        title: &str,
        severity: Severity,
        score_delta: i32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            detector: detector.to_string(),
            title: title.to_string(),
            severity,
            summary: String::new(),
            locator: None,
            score_delta: score_delta.min(0),
            timestamp,
            element_index: None,
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = truncate_chars(summary.trim(), MAX_SUMMARY_CHARS);
        self
    }

    /// Attach the element the finding is about.
    pub fn at_element(mut self, idx: usize, locator: &str) -> Self {
        self.element_index = Some(idx);
        self.locator = Some(locator.to_string());
        self
    }

    pub fn with_locator(mut self, locator: &str) -> Self {
        self.locator = Some(locator.to_string());
        self
    }

    /// The implicit safe entry of a report without findings.
    pub fn no_issues(timestamp: DateTime<Utc>) -> Self {
        Self::new("none", NO_ISSUES_TITLE, Severity::Safe, 0, timestamp)
    }

    /// The single critical finding of a degraded report; its delta zeroes the score.
    pub fn fetch_failure(failure: &FetchFailure, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            "fetch",
            FETCH_FAILURE_TITLE,
            Severity::Critical,
            -100,
            timestamp,
        )
        .with_summary(&failure.to_string())
    }

    pub fn is_element_scoped(&self) -> bool {
        self.element_index.is_some()
    }
}
