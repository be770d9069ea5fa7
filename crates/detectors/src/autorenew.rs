use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;

use crate::catalog::AUTORENEW_PHRASES;
use crate::phrase::phrase_findings;

/// Detects forced-continuity wording: trials that convert and plans that renew
/// unless the user acts.
pub struct AutoRenew {
    phrases: &'static [&'static str],
}

impl AutoRenew {
    pub fn with_phrases(phrases: &'static [&'static str]) -> Self {
        Self { phrases }
    }
}

impl Default for AutoRenew {
    fn default() -> Self {
        Self::with_phrases(AUTORENEW_PHRASES)
    }
}

impl Detector for AutoRenew {
    fn key(&self) -> DetectorKey {
        DetectorKey::AutoRenew
    }

    fn name(&self) -> &str {
        "Forced continuity language"
    }

    fn description(&self) -> &str {
        "Detects auto-renew and recurring billing wording"
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use darkux_guard::page::PageModel;

    #[test]
    fn test_one_finding_per_phrase_in_catalog_order() {
        let page = PageModel::new(
            "Cancel anytime. Your plan will AUTO-RENEW and is billed monthly.",
            Vec::new(),
        );
        let ctx = ScanContext::new(&page, Utc::now());
        let findings = AutoRenew::default().detect(&ctx);

        let summaries: Vec<&str> = findings.iter().map(|f| f.summary.as_str()).collect();
        assert_eq!(summaries, vec!["auto-renew", "billed monthly", "cancel anytime"]);
        assert!(findings.iter().all(|f| f.locator.is_none()));
    }

    #[test]
    fn test_no_match() {
        let page = PageModel::new("one-time purchase, no subscription", Vec::new());
        let ctx = ScanContext::new(&page, Utc::now());
        assert!(AutoRenew::default().detect(&ctx).is_empty());
    }
}
