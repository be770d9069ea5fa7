use darkux_guard::config::{self, Config, DetectorConfig};
use darkux_guard::detector::DetectorKey;
use darkux_guard::finding::Severity;
use darkux_guard::page::PageModel;
use darkux_guard::report::DetectionReport;
use darkux_guard::Target;
use darkux_guard_detectors::DetectionEngine;
use darkux_guard_monitor::{html, FilePageSource, PageSource};

fn scan_html(source: &str, detectors: DetectorConfig) -> DetectionReport {
    let page = html::snapshot(source);
    DetectionEngine::new(detectors).run(Some(&Target::new("fixture.html")), &page)
}

fn detectors_in(report: &DetectionReport) -> Vec<&str> {
    report.issues().map(|f| f.detector.as_str()).collect()
}

#[test]
fn test_dark_checkout_has_findings() {
    let report = scan_html(
        include_str!("fixtures/dark_checkout.html"),
        DetectorConfig::default(),
    );

    assert_eq!(
        detectors_in(&report),
        vec![
            "prechecked",
            "confirmshaming",
            "autorenew",
            "autorenew",
            "hiddencancel",
            "tinydisclaimer",
            "vaguecta"
        ]
    );
    assert_eq!(report.score(), 0);
    assert_eq!(report.counts().critical, 2);
    assert_eq!(report.counts().moderate, 5);

    let prechecked = &report.findings()[0];
    assert_eq!(prechecked.summary, "Send me partner offers");
    assert_eq!(prechecked.severity, Severity::Moderate);

    let cancel = report
        .issues()
        .find(|f| f.detector == "hiddencancel")
        .unwrap();
    assert_eq!(cancel.summary, "cancel subscription");
    assert_eq!(cancel.locator.as_deref(), Some("a"));
}

#[test]
fn test_opt_in_detectors_fire_when_enabled() {
    let report = scan_html(
        include_str!("fixtures/dark_checkout.html"),
        DetectorConfig::all_enabled(),
    );
    let found = detectors_in(&report);

    for key in DetectorKey::ALL {
        assert!(found.contains(&key.as_str()), "{key} not found in {found:?}");
    }
    // script text is not page text
    let scarcity: Vec<&str> = report
        .issues()
        .filter(|f| f.detector == "scarcity")
        .map(|f| f.summary.as_str())
        .collect();
    assert_eq!(scarcity, vec!["only N left", "hurry"]);
}

#[test]
fn test_clean_checkout_is_safe() {
    let report = scan_html(
        include_str!("fixtures/clean_checkout.html"),
        DetectorConfig::all_enabled(),
    );

    assert_eq!(report.score(), 100, "unexpected findings: {:?}", report.findings());
    assert_eq!(report.findings().len(), 1);
    assert_eq!(report.findings()[0].severity, Severity::Safe);
    assert!(!report.has_critical());
}

#[test]
fn test_captured_snapshot_uses_layout_data() {
    let page: PageModel =
        serde_json::from_str(include_str!("fixtures/captured_snapshot.json")).unwrap();
    let report = DetectionEngine::new(DetectorConfig::default()).run(None, &page);

    assert_eq!(
        detectors_in(&report),
        vec!["hiddencancel", "tinydisclaimer", "vaguecta"]
    );
    assert_eq!(report.score(), 50);
    assert_eq!(report.findings()[0].locator.as_deref(), Some("#unsub"));
}

#[test]
fn test_inline_ignore_attribute() {
    let source = r#"<div data-darkux-ignore="prechecked">
        <label>Keep me posted <input type="checkbox" checked></label>
    </div>
    <label>Share my data <input type="checkbox" checked></label>"#;
    let report = scan_html(source, DetectorConfig::default());

    assert_eq!(report.findings().len(), 1);
    assert_eq!(report.findings()[0].summary, "Share my data");
}

#[test]
fn test_hidden_text_does_not_lower_score() {
    let report = scan_html(
        r#"<p>Buy now</p><div style="display:none">No thanks, I'll miss out</div>
           <div hidden>plus fees</div>"#,
        DetectorConfig::all_enabled(),
    );
    assert_eq!(report.score(), 100, "unexpected findings: {:?}", report.findings());
}

#[test]
fn test_minified_markup_still_matches_phrases() {
    let report = scan_html(
        "<h2>Hurry</h2><p>Sale on now</p><div><p>Your card will be charged</p><button>Continue</button></div>",
        DetectorConfig::all_enabled(),
    );
    let found = detectors_in(&report);
    assert!(found.contains(&"scarcity"), "{found:?}");
    assert!(found.contains(&"vaguecta"), "{found:?}");
}

#[test]
fn test_config_file_drives_engine() {
    let toml = r##"
[detectors]
prechecked = false
Scarcity = true

[suppressions]
locators = ["a"]
"##;
    let config: Config = toml::from_str(toml).unwrap();
    let engine = DetectionEngine::new(config.detector_config())
        .with_suppressions(config.suppressions.clone());
    let page = html::snapshot(include_str!("fixtures/dark_checkout.html"));
    let report = engine.run(None, &page);
    let found = detectors_in(&report);

    assert!(!found.contains(&"prechecked"));
    assert!(found.contains(&"scarcity"));
    // the hidden link's locator is suppressed
    assert!(!found.contains(&"hiddencancel"));
}

#[test]
fn test_default_config_roundtrip() {
    let config: Config = toml::from_str(Config::default_toml()).unwrap();
    assert_eq!(config.detector_config(), DetectorConfig::default());
    assert_eq!(config.monitor.interval_ms, config::DEFAULT_INTERVAL_MS);
}

#[tokio::test]
async fn test_file_source_reads_fixture() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/dark_checkout.html");
    let page = FilePageSource.fetch(&Target::new(path)).await.unwrap();
    assert!(page.text().contains("auto-renew"));
    assert!(!page.text().contains("window.banner"));

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/captured_snapshot.json");
    let page = FilePageSource.fetch(&Target::new(path)).await.unwrap();
    assert_eq!(page.elements().len(), 4);
}
