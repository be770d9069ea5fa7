use chrono::{DateTime, Utc};

use super::traits::Detector;
use crate::finding::Finding;
use crate::page::{ElementView, PageModel};

/// Gives detectors read access to the page snapshot and the scan timestamp.
pub struct ScanContext<'a> {
    page: &'a PageModel,
    timestamp: DateTime<Utc>,
}

impl<'a> ScanContext<'a> {
    pub fn new(page: &'a PageModel, timestamp: DateTime<Utc>) -> Self {
        Self { page, timestamp }
    }

    pub fn page(&self) -> &'a PageModel {
        self.page
    }

    /// Normalized page text
    pub fn text(&self) -> &'a str {
        self.page.text()
    }

    pub fn elements(&self) -> &'a [ElementView] {
        self.page.elements()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Start a finding stamped with the detector's metadata and this scan's time
    pub fn finding(&self, detector: &dyn Detector) -> Finding {
        Finding::new(
            detector.key().as_str(),
            detector.name(),
            detector.severity(),
            detector.score_delta(),
            self.timestamp,
        )
    }
}
