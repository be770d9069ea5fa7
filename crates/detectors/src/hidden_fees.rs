use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;

use crate::catalog::HIDDEN_FEE_PHRASES;
use crate::phrase::phrase_findings;

/// Detects prices that leave part of the cost for later.
pub struct HiddenFees {
    phrases: &'static [&'static str],
}

impl HiddenFees {
    pub fn with_phrases(phrases: &'static [&'static str]) -> Self {
        Self { phrases }
    }
}

impl Default for HiddenFees {
    fn default() -> Self {
        Self::with_phrases(HIDDEN_FEE_PHRASES)
    }
}

impl Detector for HiddenFees {
    fn key(&self) -> DetectorKey {
        DetectorKey::HiddenFees
    }

    fn name(&self) -> &str {
        "Hidden fee language"
    }

    fn description(&self) -> &str {
        "Detects wording that defers fees, taxes or shipping costs"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn score_delta(&self) -> i32 {
        -15
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        phrase_findings(self, ctx, self.phrases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use darkux_guard::page::PageModel;

    #[test]
    fn test_detects_fee_language() {
        let page = PageModel::new(
            "$9.99 excluding tax. A processing fee may apply.",
            Vec::new(),
        );
        let ctx = ScanContext::new(&page, Utc::now());
        let findings = HiddenFees::default().detect(&ctx);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].summary, "excluding tax");
        assert_eq!(findings[1].summary, "processing fee");
        assert_eq!(findings[0].score_delta, -15);
    }
}
