mod display;
pub mod types;

pub use types::*;
