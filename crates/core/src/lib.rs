pub mod config;
pub mod detector;
pub mod error;
pub mod finding;
pub mod page;
pub mod report;
pub mod target;

pub use error::{ConfigError, FetchFailure};
pub use target::Target;
