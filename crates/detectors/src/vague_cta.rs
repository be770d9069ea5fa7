use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;
use darkux_guard::page::{normalize_text, truncate_chars, ElementView};

use crate::catalog::{BUTTON_INPUT_TYPES, CHARGE_TERMS, VAGUE_CTA_LABELS};

const NEARBY_CHARS: usize = 90;

/// Detects generic call-to-action labels ("Continue", "OK") sitting next to
/// wording about a charge, where the click likely commits to paying.
pub struct VagueCta;

impl Detector for VagueCta {
    fn key(&self) -> DetectorKey {
        DetectorKey::VagueCta
    }

    fn name(&self) -> &str {
        "Vague CTA (possible hidden charge)"
    }

    fn description(&self) -> &str {
        "Detects generic button labels placed next to charge or subscription wording"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn score_delta(&self) -> i32 {
        -20
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        let page = ctx.page();
        let mut findings = Vec::new();

        for (idx, el) in ctx.elements().iter().enumerate() {
            if !is_clickable(el) {
                continue;
            }
            let label = el.label();
            if !VAGUE_CTA_LABELS.contains(&label.as_str()) {
                continue;
            }

            // the containing element's text is what a reader sees next to the button
            let nearby = page
                .parent_of(idx)
                .map(|(_, parent)| normalize_text(&parent.text))
                .unwrap_or_default();
            if !CHARGE_TERMS.iter().any(|term| nearby.contains(term)) {
                continue;
            }

            findings.push(
                ctx.finding(self)
                    .with_summary(&format!(
                        "{label} (nearby: {})",
                        truncate_chars(&nearby, NEARBY_CHARS)
                    ))
                    .at_element(idx, &el.selector_hint),
            );
        }

        findings
    }
}

fn is_clickable(el: &ElementView) -> bool {
    el.is_tag("button")
        || el.is_tag("a")
        || (el.is_tag("input") && BUTTON_INPUT_TYPES.contains(&el.input_type().as_str()))
}
