pub mod context;
pub mod key;
pub mod registry;
pub mod traits;

pub use context::ScanContext;
pub use key::DetectorKey;
pub use registry::{DetectorDiagnostic, DetectorRegistry, DetectorRun};
pub use traits::Detector;
