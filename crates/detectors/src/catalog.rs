//! Fixed rule content. Detectors take these tables by default and accept
//! replacements, so rule content can be tested apart from rule execution.

/// Copy that shames the user for declining.
pub const CONFIRMSHAMING_PHRASES: &[&str] = &[
    "no thanks",
    "i don’t want",
    "i don't want",
    "skip this deal",
    "not interested",
    "i’ll miss out",
    "i'll miss out",
];

/// Forced-continuity wording.
pub const AUTORENEW_PHRASES: &[&str] = &[
    "auto-renew",
    "automatically renews",
    "billed monthly",
    "cancel anytime",
    "subscription will continue",
    "trial will convert",
];

/// Wording that defers part of the price.
pub const HIDDEN_FEE_PHRASES: &[&str] = &[
    "additional fees apply",
    "excluding tax",
    "plus fees",
    "shipping not included",
    "additional cost",
    "processing fee",
];

/// A regular expression plus the description reported when it matches.
#[derive(Debug, Clone, Copy)]
pub struct PatternEntry {
    pub description: &'static str,
    pub pattern: &'static str,
}

/// Urgency and low-stock pressure. Matched case-insensitively.
pub const SCARCITY_PATTERNS: &[PatternEntry] = &[
    PatternEntry {
        description: "only N left",
        pattern: r"only\s+\d+\s+left",
    },
    PatternEntry {
        description: "selling fast",
        pattern: r"selling fast",
    },
    PatternEntry {
        description: "limited stock",
        pattern: r"limited stock",
    },
    PatternEntry {
        description: "hurry",
        pattern: r"\bhurry\b",
    },
    PatternEntry {
        description: "ends soon",
        pattern: r"ends (soon|in \d+)",
    },
];

/// Vocabulary of controls that end a subscription.
pub const CANCEL_VOCABULARY: &[&str] = &[
    "cancel",
    "unsubscribe",
    "opt-out",
    "stop subscription",
    "manage subscription",
];

/// Elements checked for obscured cancel controls.
pub const CANCEL_CANDIDATE_TAGS: &[&str] = &["a", "button", "input", "span", "div"];

/// Generic button labels that say nothing about a charge.
pub const VAGUE_CTA_LABELS: &[&str] = &["continue", "next", "submit", "ok", "accept", "proceed"];

/// Terms near a call-to-action that indicate money changes hands.
pub const CHARGE_TERMS: &[&str] = &[
    "charge",
    "subscription",
    "free trial",
    "auto-renew",
    "billing",
    "cost",
    "fee",
];

/// `input` types that behave as buttons.
pub const BUTTON_INPUT_TYPES: &[&str] = &["button", "submit"];

/// Class fragments marking overlays.
pub const NAG_CLASS_MARKERS: &[&str] = &["popup", "modal"];

/// ARIA roles marking overlays.
pub const NAG_ROLES: &[&str] = &["dialog"];

/// Elements that carry running text.
pub const TEXT_TAGS: &[&str] = &["p", "span", "div", "li", "label", "small"];

/// Font size in pixels below which text counts as a micro disclaimer.
pub const TINY_FONT_PX: f32 = 10.0;
