use std::time::Duration;

use async_trait::async_trait;
use darkux_guard::config::SourceConfig;
use darkux_guard::page::PageModel;
use darkux_guard::{FetchFailure, Target};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::html;
use crate::source::PageSource;

const DEFAULT_USER_AGENT: &str = concat!("darkux-guard/", env!("CARGO_PKG_VERSION"));

/// Fetches live pages over HTTP and snapshots the returned markup.
pub struct HttpPageSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageSource {
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &SourceConfig) -> reqwest::Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.as_deref(),
        )
    }

    fn transport_failure(&self, err: reqwest::Error) -> FetchFailure {
        if err.is_timeout() {
            FetchFailure::Timeout(self.timeout)
        } else {
            FetchFailure::Network(err.to_string())
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, target: &Target) -> Result<PageModel, FetchFailure> {
        let url = parse_target(target)?;
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.transport_failure(err))?;

        classify_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|err| self.transport_failure(err))?;
        Ok(html::snapshot(&body))
    }
}

/// Resolve a target to an http(s) URL; bare hosts get `http://`.
pub fn parse_target(target: &Target) -> Result<Url, FetchFailure> {
    let invalid = |reason: String| FetchFailure::InvalidTarget {
        target: target.to_string(),
        reason,
    };

    if target.is_empty() {
        return Err(invalid("empty target".to_string()));
    }
    let url = Url::parse(&target.to_url_string()).map_err(|err| invalid(err.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn classify_status(status: StatusCode) -> Result<(), FetchFailure> {
    match status.as_u16() {
        401 | 403 | 451 => Err(FetchFailure::Blocked {
            status: status.as_u16(),
        }),
        _ if !status.is_success() => Err(FetchFailure::Status {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown").to_string(),
        }),
        _ => Ok(()),
    }
}
