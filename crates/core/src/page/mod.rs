//! Engine-facing snapshot of a rendered page.
//!
//! Page sources produce a [`PageModel`]; detectors only ever read it.

pub mod text;
pub mod types;

pub use text::{normalize_text, truncate_chars};
pub use types::{selector_hint, ComputedStyle, ElementView, PageModel, Rect};
