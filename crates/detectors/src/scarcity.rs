use std::sync::LazyLock;

use darkux_guard::detector::{Detector, DetectorKey, ScanContext};
use darkux_guard::finding::*;
use regex::{Regex, RegexBuilder};

use crate::catalog::{PatternEntry, SCARCITY_PATTERNS};

static BUILTIN: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    compile(SCARCITY_PATTERNS).expect("built-in scarcity patterns are valid regexes")
});

/// Detects urgency and low-stock pressure ("only 2 left", "hurry").
pub struct Scarcity {
    patterns: Vec<(&'static str, Regex)>,
}

impl Scarcity {
    /// Use a different pattern table. Fails on the first invalid expression.
    pub fn with_patterns(entries: &[PatternEntry]) -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: compile(entries)?,
        })
    }
}

impl Default for Scarcity {
    fn default() -> Self {
        Self {
            patterns: BUILTIN.clone(),
        }
    }
}

fn compile(entries: &[PatternEntry]) -> Result<Vec<(&'static str, Regex)>, regex::Error> {
    entries
        .iter()
        .map(|entry| {
            RegexBuilder::new(entry.pattern)
                .case_insensitive(true)
                .build()
                .map(|rx| (entry.description, rx))
        })
        .collect()
}

impl Detector for Scarcity {
    fn key(&self) -> DetectorKey {
        DetectorKey::Scarcity
    }

    fn name(&self) -> &str {
        "Scarcity tactic"
    }

    fn description(&self) -> &str {
        "Detects urgency and low-stock pressure in page copy"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn score_delta(&self) -> i32 {
        -15
    }

    fn detect(&self, ctx: &ScanContext) -> Vec<Finding> {
        let text = ctx.text();
        self.patterns
            .iter()
            .filter(|(_, rx)| rx.is_match(text))
            .map(|(description, _)| ctx.finding(self).with_summary(description))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use darkux_guard::page::PageModel;

    fn analyze(text: &str) -> Vec<Finding> {
        let page = PageModel::new(text, Vec::new());
        let ctx = ScanContext::new(&page, Utc::now());
        Scarcity::default().detect(&ctx)
    }

    #[test]
    fn test_builtin_patterns_compile() {
        assert_eq!(Scarcity::default().patterns.len(), SCARCITY_PATTERNS.len());
    }

    #[test]
    fn test_detects_stock_and_urgency() {
        let findings = analyze("HURRY! Only 3   left in stock. Sale ends in 2 hours");
        let summaries: Vec<&str> = findings.iter().map(|f| f.summary.as_str()).collect();
        assert_eq!(summaries, vec!["only N left", "hurry", "ends soon"]);
    }

    #[test]
    fn test_word_boundary_on_hurry() {
        assert!(analyze("no hurrying needed, ends whenever").is_empty());
    }

    #[test]
    fn test_each_pattern_counts_once() {
        let findings = analyze("only 1 left! only 2 left! only 5 left!");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].score_delta, -15);
    }

    #[test]
    fn test_invalid_injected_pattern() {
        let entries = [PatternEntry {
            description: "broken",
            pattern: "(unclosed",
        }];
        assert!(Scarcity::with_patterns(&entries).is_err());
    }
}
