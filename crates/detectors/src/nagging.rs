use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;
use darkux_guard::page::ElementView;

use crate::catalog::{NAG_CLASS_MARKERS, NAG_ROLES};

/// Detects popups, modals and dialogs that interrupt the page.
/// Reports once per page with the overlay count, whatever the count.
pub struct Nagging;

impl Detector for Nagging {
    fn key(&self) -> DetectorKey {
        DetectorKey::Nagging
    }

    fn name(&self) -> &str {
        "Nagging popup/modal"
    }

    fn description(&self) -> &str {
        "Detects popup, modal and dialog overlays"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn score_delta(&self) -> i32 {
        -10
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        let overlays: Vec<&ElementView> = ctx.elements().iter().filter(|el| is_overlay(el)).collect();
        let Some(first) = overlays.first() else {
            return Vec::new();
        };

        vec![ctx
            .finding(self)
            .with_summary(&format!("{} popup/modal element(s)", overlays.len()))
            .with_locator(&first.selector_hint)]
    }
}

/// `div[class*=popup|modal]`, `.popup`, `.modal` or `[role=dialog]`.
fn is_overlay(el: &ElementView) -> bool {
    let class_attr = el.attr("class").unwrap_or_default().to_lowercase();
    let div_marker = el.is_tag("div") && NAG_CLASS_MARKERS.iter().any(|m| class_attr.contains(m));
    let class_marker = el
        .classes()
        .any(|c| NAG_CLASS_MARKERS.iter().any(|m| c.eq_ignore_ascii_case(m)));
    let role_marker = el
        .attr("role")
        .is_some_and(|role| NAG_ROLES.iter().any(|r| role.trim().eq_ignore_ascii_case(r)));

    div_marker || class_marker || role_marker
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use darkux_guard::page::PageModel;

    fn analyze(elements: Vec<ElementView>) -> Vec<Finding> {
        let page = PageModel::new("", elements);
        let ctx = ScanContext::new(&page, Utc::now());
        Nagging.detect(&ctx)
    }

    #[test]
    fn test_single_flat_finding_with_count() {
        let findings = analyze(vec![
            ElementView::new("div").with_attr("class", "newsletter-popup"),
            ElementView::new("section").with_attr("role", "Dialog"),
            ElementView::new("aside").with_attr("class", "modal fade"),
        ]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].summary, "3 popup/modal element(s)");
        assert_eq!(findings[0].score_delta, -10);
        assert_eq!(findings[0].locator.as_deref(), Some("div.newsletter-popup"));
        assert!(!findings[0].is_element_scoped());
    }

    #[test]
    fn test_substring_only_counts_on_divs() {
        let findings = analyze(vec![
            ElementView::new("span").with_attr("class", "modal-title"),
            ElementView::new("p"),
        ]);
        assert!(findings.is_empty());
    }
}
