use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;
use darkux_guard::page::truncate_chars;

use crate::catalog::{TEXT_TAGS, TINY_FONT_PX};

const SUMMARY_CHARS: usize = 120;

/// Detects micro-font text, where terms tend to hide.
pub struct TinyDisclaimer;

impl Detector for TinyDisclaimer {
    fn key(&self) -> DetectorKey {
        DetectorKey::TinyDisclaimer
    }

    fn name(&self) -> &str {
        "Tiny disclaimer"
    }

    fn description(&self) -> &str {
        "Detects text rendered below 10px"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn score_delta(&self) -> i32 {
        -5
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        ctx.elements()
            .iter()
            .enumerate()
            .filter(|(_, el)| TEXT_TAGS.contains(&el.tag.as_str()) && !el.text.trim().is_empty())
            .filter(|(_, el)| {
                el.computed_style
                    .font_size_px
                    .is_some_and(|px| px > 0.0 && px < TINY_FONT_PX)
            })
            .map(|(idx, el)| {
                ctx.finding(self)
                    .with_summary(&truncate_chars(&el.text, SUMMARY_CHARS))
                    .at_element(idx, &el.selector_hint)
            })
            .collect()
    }
}
