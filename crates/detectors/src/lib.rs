//! Built-in dark-pattern detectors and the engine that runs them.

mod catalog;
mod phrase;

pub mod autorenew;
pub mod confirmshaming;
pub mod engine;
pub mod hidden_cancel;
pub mod hidden_fees;
pub mod nagging;
pub mod prechecked;
pub mod scarcity;
pub mod tiny_disclaimer;
pub mod vague_cta;

pub use autorenew::AutoRenew;
pub use catalog::PatternEntry;
pub use confirmshaming::ConfirmShaming;
pub use engine::{run_detection, DetectionEngine};
pub use hidden_cancel::HiddenCancel;
pub use hidden_fees::HiddenFees;
pub use nagging::Nagging;
pub use prechecked::PreChecked;
pub use scarcity::Scarcity;
pub use tiny_disclaimer::TinyDisclaimer;
pub use vague_cta::VagueCta;

/// Returns all built-in detectors, in catalog order
pub fn all_detectors() -> Vec<Box<dyn darkux_guard::detector::Detector>> {
    vec![
        Box::new(PreChecked),
        Box::new(ConfirmShaming::default()),
        Box::new(AutoRenew::default()),
        Box::new(Scarcity::default()),
        Box::new(Nagging),
        Box::new(HiddenFees::default()),
        Box::new(HiddenCancel),
        Box::new(TinyDisclaimer),
        Box::new(VagueCta),
    ]
}
