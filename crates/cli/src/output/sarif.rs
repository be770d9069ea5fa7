use std::collections::BTreeMap;

use anyhow::Result;
use darkux_guard::finding::Severity;
use darkux_guard::report::DetectionReport;
use serde_json::json;

/// Print SARIF 2.1.0 output for code-scanning dashboards
pub fn print(reports: &[DetectionReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_sarif(reports))?;
    println!("{json}");
    Ok(())
}

fn to_sarif(reports: &[DetectionReport]) -> serde_json::Value {
    let detectors = darkux_guard_detectors::all_detectors();

    // rule metadata comes from the detectors, not from individual findings
    let mut rules: BTreeMap<&str, serde_json::Value> = BTreeMap::new();
    let mut results = Vec::new();

    for report in reports {
        let uri = report.target().map(|t| t.as_str()).unwrap_or("page");

        for finding in report.issues() {
            let description = detectors
                .iter()
                .find(|d| d.key().as_str() == finding.detector)
                .map(|d| d.description().to_string())
                .unwrap_or_else(|| "Page could not be loaded".to_string());

            rules.entry(finding.detector.as_str()).or_insert_with(|| {
                json!({
                    "id": finding.detector,
                    "name": finding.title,
                    "shortDescription": { "text": description },
                    "defaultConfiguration": { "level": severity_to_sarif_level(finding.severity) }
                })
            });

            let mut location = json!({
                "physicalLocation": {
                    "artifactLocation": { "uri": uri }
                }
            });
            if let Some(locator) = &finding.locator {
                location["logicalLocations"] = json!([{
                    "fullyQualifiedName": locator,
                    "kind": "element"
                }]);
            }

            let message = if finding.summary.is_empty() {
                finding.title.clone()
            } else {
                format!("{}: {}", finding.title, finding.summary)
            };

            results.push(json!({
                "ruleId": finding.detector,
                "level": severity_to_sarif_level(finding.severity),
                "message": { "text": message },
                "locations": [location],
                "properties": { "scoreDelta": finding.score_delta }
            }));
        }
    }

    let scores: Vec<serde_json::Value> = reports
        .iter()
        .map(|r| {
            json!({
                "target": r.target(),
                "score": r.score()
            })
        })
        .collect();

    json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "darkux-guard",
                    "version": env!("CARGO_PKG_VERSION"),
                    "informationUri": "https://github.com/safestackai/darkux-guard",
                    "rules": rules.into_values().collect::<Vec<_>>()
                }
            },
            "results": results,
            "properties": { "scores": scores }
        }]
    })
}

fn severity_to_sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "error",
        Severity::Moderate => "warning",
        Severity::Safe => "note",
    }
}
