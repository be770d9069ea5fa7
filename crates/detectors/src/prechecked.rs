use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;
use darkux_guard::page::{truncate_chars, ElementView, PageModel};

const LABEL_CHARS: usize = 100;

/// Detects checkboxes that are ticked before the user touches them.
/// Pre-checked consent boxes opt people into mailings and add-ons by default.
pub struct PreChecked;

impl Detector for PreChecked {
    fn key(&self) -> DetectorKey {
        DetectorKey::PreChecked
    }

    fn name(&self) -> &str {
        "Pre-checked checkbox"
    }

    fn description(&self) -> &str {
        "Detects checkboxes that are checked by default"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn score_delta(&self) -> i32 {
        -15
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        let page = ctx.page();
        let mut findings = Vec::new();

        for (idx, el) in ctx.elements().iter().enumerate() {
            if !is_default_checked_checkbox(el) {
                continue;
            }
            let label = label_text(page, idx, el).unwrap_or_default();
            findings.push(
                ctx.finding(self)
                    .with_summary(&truncate_chars(label.trim(), LABEL_CHARS))
                    .at_element(idx, &el.selector_hint),
            );
        }

        findings
    }
}

fn is_default_checked_checkbox(el: &ElementView) -> bool {
    el.is_tag("input") && el.input_type() == "checkbox" && el.has_attr("checked")
}

/// Nearest enclosing `<label>`, else a `<label for=...>` pointing at the box.
fn label_text(page: &PageModel, idx: usize, el: &ElementView) -> Option<String> {
    if let Some((_, label)) = page.closest(idx, "label") {
        return Some(label.text.clone());
    }
    let id = el.attr("id").map(str::trim).filter(|id| !id.is_empty())?;
    page.elements()
        .iter()
        .find(|candidate| candidate.is_tag("label") && candidate.attr("for") == Some(id))
        .map(|label| label.text.clone())
}
