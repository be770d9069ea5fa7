use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;
use darkux_guard::page::truncate_chars;

use crate::catalog::{CANCEL_CANDIDATE_TAGS, CANCEL_VOCABULARY};

const SUMMARY_CHARS: usize = 120;

/// Detects cancel/unsubscribe controls that exist but cannot realistically be used:
/// not displayed, invisible, near-transparent, tiny, or ignoring pointer events.
pub struct HiddenCancel;

impl Detector for HiddenCancel {
    fn key(&self) -> DetectorKey {
        DetectorKey::HiddenCancel
    }

    fn name(&self) -> &str {
        "Hidden cancel/unsubscribe"
    }

    fn description(&self) -> &str {
        "Detects cancel or unsubscribe controls that are hidden or not clickable"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn score_delta(&self) -> i32 {
        -25
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, el) in ctx.elements().iter().enumerate() {
            if !CANCEL_CANDIDATE_TAGS.contains(&el.tag.as_str()) {
                continue;
            }
            let label = el.label();
            if label.is_empty() || !mentions_cancel(&label) {
                continue;
            }
            if el.is_effectively_hidden() {
                findings.push(
                    ctx.finding(self)
                        .with_summary(&truncate_chars(&label, SUMMARY_CHARS))
                        .at_element(idx, &el.selector_hint),
                );
            }
        }

        findings
    }
}

fn mentions_cancel(label: &str) -> bool {
    CANCEL_VOCABULARY.iter().any(|word| label.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use darkux_guard::page::{ComputedStyle, ElementView, PageModel, Rect};

    fn analyze(elements: Vec<ElementView>) -> Vec<Finding> {
        let page = PageModel::new("", elements);
        let ctx = ScanContext::new(&page, Utc::now());
        HiddenCancel.detect(&ctx)
    }

    fn styled(tag: &str, text: &str, style: ComputedStyle) -> ElementView {
        ElementView::new(tag).with_text(text).with_style(style)
    }

    #[test]
    fn test_detects_each_hiding_technique() {
        let findings = analyze(vec![
            styled(
                "a",
                "Cancel subscription",
                ComputedStyle {
                    display: "none".to_string(),
                    ..ComputedStyle::default()
                },
            ),
            styled(
                "button",
                "Unsubscribe",
                ComputedStyle {
                    visibility: "hidden".to_string(),
                    ..ComputedStyle::default()
                },
            ),
            styled(
                "span",
                "Opt-out",
                ComputedStyle {
                    opacity: 0.02,
                    ..ComputedStyle::default()
                },
            ),
            styled(
                "div",
                "Manage subscription",
                ComputedStyle {
                    pointer_events: "none".to_string(),
                    ..ComputedStyle::default()
                },
            ),
            ElementView::new("a")
                .with_text("cancel")
                .with_rect(Rect::new(10.0, 10.0, 40.0, 3.0)),
        ]);
        assert_eq!(findings.len(), 5);
        assert!(findings.iter().all(|f| f.severity == Severity::Critical));
        assert!(findings.iter().all(|f| f.score_delta == -25));
        assert_eq!(findings[0].summary, "cancel subscription");
    }

    #[test]
    fn test_visible_cancel_is_fine() {
        let findings = analyze(vec![ElementView::new("button")
            .with_text("Cancel")
            .with_rect(Rect::new(0.0, 0.0, 90.0, 30.0))]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_one_finding_per_element_even_with_many_words() {
        let findings = analyze(vec![styled(
            "a",
            "Unsubscribe or cancel or opt-out",
            ComputedStyle {
                display: "none".to_string(),
                ..ComputedStyle::default()
            },
        )]);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_input_value_is_the_label() {
        let findings = analyze(vec![ElementView::new("input")
            .with_attr("type", "submit")
            .with_attr("value", "Cancel membership")
            .with_rect(Rect::new(0.0, 0.0, 1.0, 1.0))]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].summary, "cancel membership");
    }

    #[test]
    fn test_non_candidate_tags_ignored() {
        let findings = analyze(vec![styled(
            "p",
            "Cancel anytime",
            ComputedStyle {
                display: "none".to_string(),
                ..ComputedStyle::default()
            },
        )]);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_hiding_thresholds_are_exclusive() {
        let faded = |opacity| {
            styled(
                "a",
                "Cancel",
                ComputedStyle {
                    opacity,
                    ..ComputedStyle::default()
                },
            )
        };
        let boxed = |width, height| {
            ElementView::new("a")
                .with_text("Cancel")
                .with_rect(Rect::new(0.0, 0.0, width, height))
        };

        let findings = analyze(vec![
            faded(0.05),
            faded(0.04),
            boxed(6.0, 6.0),
            boxed(5.9, 40.0),
            boxed(40.0, 5.9),
        ]);
        let flagged: Vec<Option<usize>> = findings.iter().map(|f| f.element_index).collect();
        assert_eq!(flagged, vec![Some(1), Some(3), Some(4)]);
    }
}
