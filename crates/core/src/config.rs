use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::detector::key::normalize_key;
use crate::detector::DetectorKey;
use crate::error::ConfigError;
use crate::finding::Finding;
use crate::page::PageModel;

/// Attribute that silences findings on an element and its descendants.
/// Empty or `*` silences every detector; otherwise a comma-separated key list.
pub const SUPPRESSION_ATTR: &str = "data-darkux-ignore";

/// Default monitoring interval, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 20_000;

/// Per-detector enable flags. Every catalog key always has a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DetectorConfig {
    flags: BTreeMap<DetectorKey, bool>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            flags: DetectorKey::ALL
                .into_iter()
                .map(|k| (k, k.default_enabled()))
                .collect(),
        }
    }
}

impl DetectorConfig {
    pub fn all_enabled() -> Self {
        Self::uniform(true)
    }

    pub fn all_disabled() -> Self {
        Self::uniform(false)
    }

    /// Only the given detectors run.
    pub fn only(keys: &[DetectorKey]) -> Self {
        let mut config = Self::all_disabled();
        for key in keys {
            config.set(*key, true);
        }
        config
    }

    fn uniform(enabled: bool) -> Self {
        Self {
            flags: DetectorKey::ALL.into_iter().map(|k| (k, enabled)).collect(),
        }
    }

    pub fn is_enabled(&self, key: DetectorKey) -> bool {
        self.flags
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_enabled())
    }

    pub fn set(&mut self, key: DetectorKey, enabled: bool) {
        self.flags.insert(key, enabled);
    }

    /// Set a flag by raw (un-normalized) key name.
    pub fn set_raw(&mut self, raw_key: &str, enabled: bool) -> Result<(), ConfigError> {
        let key = DetectorKey::parse(raw_key)
            .ok_or_else(|| ConfigError::UnknownKey(normalize_key(raw_key)))?;
        self.set(key, enabled);
        Ok(())
    }

    /// Overlay raw flags on the defaults. Unknown keys are ignored and reported.
    pub fn from_flags<I, K>(flags: I) -> (Self, Vec<ConfigError>)
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();
        for (raw_key, enabled) in flags {
            if let Err(err) = config.set_raw(raw_key.as_ref(), enabled) {
                errors.push(err);
            }
        }
        (config, errors)
    }

    /// Overlay a TOML `[detectors]` table on the defaults. Unknown keys and
    /// non-boolean values keep the default and are reported.
    pub fn from_toml_table(table: &toml::Table) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();
        for (raw_key, value) in table {
            match value.as_bool() {
                Some(enabled) => {
                    if let Err(err) = config.set_raw(raw_key, enabled) {
                        errors.push(err);
                    }
                }
                None => errors.push(ConfigError::InvalidValue {
                    key: raw_key.clone(),
                    found: value.to_string(),
                }),
            }
        }
        (config, errors)
    }

    pub fn enabled_keys(&self) -> Vec<DetectorKey> {
        DetectorKey::ALL
            .into_iter()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}

/// Project-level configuration loaded from `.darkux-guard.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    detectors: toml::Table,
    pub monitor: MonitorConfig,
    pub source: SourceConfig,
    pub suppressions: SuppressionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_ms: u64,
    pub deliver_after_stop: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            deliver_after_stop: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// Glob patterns matched against finding locators.
    pub locators: Vec<String>,
}

impl Config {
    /// Load config from a TOML file path. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Like [`Config::load`], but a broken file only costs a warning.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default configuration");
            Self::default()
        })
    }

    /// Resolve the `[detectors]` table, logging every ignored entry.
    pub fn detector_config(&self) -> DetectorConfig {
        let (config, errors) = DetectorConfig::from_toml_table(&self.detectors);
        for err in errors {
            warn!(error = %err, "ignoring detector setting");
        }
        config
    }

    /// Check if a locator matches one of the suppression glob patterns.
    pub fn is_locator_suppressed(&self, locator: &str) -> bool {
        self.suppressions.is_locator_suppressed(locator)
    }

    /// Generate default config file content.
    pub fn default_toml() -> &'static str {
        r#"# darkux-guard configuration

[detectors]
# Enable or disable individual detectors (keys ignore case and spaces)
prechecked = true
confirmshaming = true
autorenew = true
scarcity = false
nagging = false
hiddenfees = false
hiddencancel = true
tinydisclaimer = true
vaguecta = true

[monitor]
# Milliseconds between scans of a monitored page
interval_ms = 20000
# Deliver the result of a scan that was in flight when monitoring stopped
deliver_after_stop = false

[source]
timeout_secs = 30
# user_agent = "darkux-guard"

[suppressions]
# Glob patterns for element locators to skip entirely
locators = []
"#
    }
}

impl SuppressionConfig {
    pub fn is_locator_suppressed(&self, locator: &str) -> bool {
        self.locators
            .iter()
            .any(|pattern| glob::Pattern::new(pattern).is_ok_and(|p| p.matches(locator)))
    }
}

/// Drop element-scoped findings silenced by an inline attribute on the
/// element or an ancestor, or by a locator pattern.
pub fn apply_suppressions(
    findings: Vec<Finding>,
    page: &PageModel,
    suppressions: &SuppressionConfig,
) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| {
            if let Some(locator) = &f.locator {
                if f.is_element_scoped() && suppressions.is_locator_suppressed(locator) {
                    return false;
                }
            }

            let Some(idx) = f.element_index else {
                return true;
            };
            let Some(element) = page.element(idx) else {
                return true;
            };

            let silenced = std::iter::once(element)
                .chain(page.ancestors(idx).map(|(_, el)| el))
                .filter_map(|el| el.attr(SUPPRESSION_ATTR))
                .any(|value| suppresses(value, &f.detector));
            !silenced
        })
        .collect()
}

fn suppresses(attr_value: &str, detector: &str) -> bool {
    let value = attr_value.trim();
    if value.is_empty() || value == "*" {
        return true;
    }
    value
        .split(',')
        .map(normalize_key)
        .any(|key| key == "*" || key == detector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use crate::page::ElementView;
    use chrono::Utc;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert!(config.is_enabled(DetectorKey::PreChecked));
        assert!(config.is_enabled(DetectorKey::VagueCta));
        assert!(!config.is_enabled(DetectorKey::Scarcity));
        assert!(!config.is_enabled(DetectorKey::Nagging));
        assert!(!config.is_enabled(DetectorKey::HiddenFees));
    }

    #[test]
    fn test_from_flags_normalizes_and_ignores_unknown() {
        let (config, errors) = DetectorConfig::from_flags([
            ("Scarcity ", true),
            ("pre checked", false),
            ("darkmode", true),
        ]);
        assert!(config.is_enabled(DetectorKey::Scarcity));
        assert!(!config.is_enabled(DetectorKey::PreChecked));
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ConfigError::UnknownKey(k) if k == "darkmode"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r##"
[detectors]
nagging = true
"Tiny Disclaimer" = false
hiddenfees = "yes"

[monitor]
interval_ms = 5000

[suppressions]
locators = ["#cookie-*"]
"##;
        let config: Config = toml::from_str(toml).unwrap();
        let detectors = config.detector_config();
        assert!(detectors.is_enabled(DetectorKey::Nagging));
        assert!(!detectors.is_enabled(DetectorKey::TinyDisclaimer));
        // malformed value keeps the default
        assert!(!detectors.is_enabled(DetectorKey::HiddenFees));
        assert_eq!(config.monitor.interval_ms, 5000);
        assert!(!config.monitor.deliver_after_stop);
        assert_eq!(config.source.timeout_secs, 30);
        assert!(config.is_locator_suppressed("#cookie-banner"));
        assert!(!config.is_locator_suppressed("#checkout"));
    }

    #[test]
    fn test_default_toml_parses() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.detector_config(), DetectorConfig::default());
        assert_eq!(config.monitor.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/.darkux-guard.toml")).unwrap();
        assert_eq!(config.detector_config(), DetectorConfig::default());
    }

    fn element_finding(detector: &str, idx: usize, locator: &str) -> Finding {
        Finding::new(detector, "test", Severity::Moderate, -5, Utc::now()).at_element(idx, locator)
    }

    #[test]
    fn test_apply_suppressions() {
        let page = PageModel::new(
            "",
            vec![
                ElementView::new("div").with_attr(SUPPRESSION_ATTR, "tinydisclaimer, Vague CTA"),
                ElementView::new("small").with_parent(0),
                ElementView::new("button").with_parent(0),
                ElementView::new("input").with_attr("id", "cookie-optin"),
                ElementView::new("p").with_attr(SUPPRESSION_ATTR, ""),
            ],
        );
        let suppressions = SuppressionConfig {
            locators: vec!["#cookie-*".to_string()],
        };

        let findings = vec![
            element_finding("tinydisclaimer", 1, "small"),
            element_finding("hiddencancel", 2, "button"),
            element_finding("vaguecta", 2, "button"),
            element_finding("prechecked", 3, "#cookie-optin"),
            element_finding("tinydisclaimer", 4, "p"),
            Finding::new("confirmshaming", "page-level", Severity::Moderate, -20, Utc::now()),
        ];

        let kept = apply_suppressions(findings, &page, &suppressions);
        let kept: Vec<&str> = kept.iter().map(|f| f.detector.as_str()).collect();
        assert_eq!(kept, vec!["hiddencancel", "confirmshaming"]);
    }
}
