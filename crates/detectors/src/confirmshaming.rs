use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;

use crate::catalog::CONFIRMSHAMING_PHRASES;
use crate::phrase::phrase_findings;

/// Detects decline options worded to guilt the user ("no thanks, I'll miss out").
pub struct ConfirmShaming {
    phrases: &'static [&'static str],
}

impl ConfirmShaming {
    pub fn with_phrases(phrases: &'static [&'static str]) -> Self {
        Self { phrases }
    }
}

impl Default for ConfirmShaming {
    fn default() -> Self {
        Self::with_phrases(CONFIRMSHAMING_PHRASES)
    }
}

impl Detector for ConfirmShaming {
    fn key(&self) -> DetectorKey {
        DetectorKey::ConfirmShaming
    }

    fn name(&self) -> &str {
        "Confirmshaming phrase"
    }

    fn description(&self) -> &str {
        "Detects copy that shames users for declining an offer"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn score_delta(&self) -> i32 {
        -20
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        phrase_findings(self, ctx, self.phrases)
    }
}
