pub mod scoring;
pub mod types;

pub use scoring::{severity_counts, trust_score, BASE_SCORE};
pub use types::*;
