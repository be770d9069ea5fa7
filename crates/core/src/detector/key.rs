use std::fmt;

use serde::Serialize;

/// Catalog key of a built-in detector. Variant order is the catalog order
/// findings are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKey {
    PreChecked,
    ConfirmShaming,
    AutoRenew,
    Scarcity,
    Nagging,
    HiddenFees,
    HiddenCancel,
    TinyDisclaimer,
    VagueCta,
}

impl DetectorKey {
    pub const ALL: [DetectorKey; 9] = [
        DetectorKey::PreChecked,
        DetectorKey::ConfirmShaming,
        DetectorKey::AutoRenew,
        DetectorKey::Scarcity,
        DetectorKey::Nagging,
        DetectorKey::HiddenFees,
        DetectorKey::HiddenCancel,
        DetectorKey::TinyDisclaimer,
        DetectorKey::VagueCta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKey::PreChecked => "prechecked",
            DetectorKey::ConfirmShaming => "confirmshaming",
            DetectorKey::AutoRenew => "autorenew",
            DetectorKey::Scarcity => "scarcity",
            DetectorKey::Nagging => "nagging",
            DetectorKey::HiddenFees => "hiddenfees",
            DetectorKey::HiddenCancel => "hiddencancel",
            DetectorKey::TinyDisclaimer => "tinydisclaimer",
            DetectorKey::VagueCta => "vaguecta",
        }
    }

    /// Look up a key after stripping whitespace and lower-casing, so
    /// `"Hidden Fees"` and `"hiddenfees"` name the same detector.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_key(raw);
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
    }

    /// Scarcity, nagging and hidden-fee checks are opt-in; the rest run by default.
    pub fn default_enabled(&self) -> bool {
        !matches!(
            self,
            DetectorKey::Scarcity | DetectorKey::Nagging | DetectorKey::HiddenFees
        )
    }
}

impl fmt::Display for DetectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
