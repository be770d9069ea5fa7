use async_trait::async_trait;
use darkux_guard::page::PageModel;
use darkux_guard::{FetchFailure, Target};

/// Produces one page snapshot per call. Implementations must report
/// navigation failures, timeouts and blocked access as [`FetchFailure`]
/// rather than return a partial model. Callers never retry.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, target: &Target) -> Result<PageModel, FetchFailure>;
}
