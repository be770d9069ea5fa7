use std::collections::HashSet;

use darkux_guard::detector::{Detector, ScanContext};
use darkux_guard::finding::Finding;
use darkux_guard::page::normalize_text;

/// One finding per distinct phrase contained in the page text, in list order.
pub(crate) fn phrase_findings(
    detector: &dyn Detector,
    ctx: &ScanContext,
    phrases: &[&str],
) -> Vec<Finding> {
    let text = ctx.text();
    let mut seen = HashSet::new();

    phrases
        .iter()
        .map(|phrase| normalize_text(phrase))
        .filter(|phrase| !phrase.is_empty() && seen.insert(phrase.clone()))
        .filter(|phrase| text.contains(phrase.as_str()))
        .map(|phrase| ctx.finding(detector).with_summary(&phrase))
        .collect()
}
