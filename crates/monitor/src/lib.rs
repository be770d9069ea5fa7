//! Page sources and the periodic monitoring loop.

pub mod file;
pub mod html;
pub mod http;
pub mod session;
pub mod source;

pub use file::FilePageSource;
pub use http::HttpPageSource;
pub use session::{MonitoringSession, ScanEvent, SessionError, SessionOptions, SessionState};
pub use source::PageSource;
