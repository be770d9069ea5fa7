use crate::finding::{Finding, Severity};

use super::types::SeverityCounts;

/// Score of a page with no findings.
pub const BASE_SCORE: i64 = 100;

/// `clamp(100 + Σ score_delta, 0, 100)`. Deltas compound; nothing is capped
/// per detector before summing.
pub fn trust_score(findings: &[Finding]) -> u8 {
    let total: i64 = findings.iter().map(|f| i64::from(f.score_delta)).sum();
    // clamped into 0..=100, so the cast is lossless
    (BASE_SCORE + total).clamp(0, BASE_SCORE) as u8
}

pub fn severity_counts(findings: &[Finding]) -> SeverityCounts {
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
    SeverityCounts {
        critical: count(Severity::Critical),
        moderate: count(Severity::Moderate),
        safe: count(Severity::Safe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn finding(severity: Severity, delta: i32) -> Finding {
        Finding::new("test", "test", severity, delta, Utc::now())
    }

    #[test]
    fn test_empty_scores_full() {
        assert_eq!(trust_score(&[]), 100);
    }

    #[test]
    fn test_deltas_compound_and_clamp() {
        let findings = vec![finding(Severity::Moderate, -15); 3];
        assert_eq!(trust_score(&findings), 55);

        let findings = vec![finding(Severity::Critical, -25); 5];
        assert_eq!(trust_score(&findings), 0);
    }

    #[test]
    fn test_counts_by_severity() {
        let findings = vec![
            finding(Severity::Critical, -25),
            finding(Severity::Moderate, -5),
            finding(Severity::Moderate, -5),
        ];
        let counts = severity_counts(&findings);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.moderate, 2);
        assert_eq!(counts.safe, 0);
        assert_eq!(counts.total(), findings.len());
    }
}
