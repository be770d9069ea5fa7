use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use darkux_guard::Target;
use darkux_guard_detectors::DetectionEngine;
use darkux_guard_monitor::{
    FilePageSource, HttpPageSource, MonitoringSession, PageSource, SessionOptions,
};

use super::{is_local, Settings};
use crate::output;
use crate::{DetectorArgs, StreamFormat};

pub async fn run(
    target: &str,
    format: StreamFormat,
    args: &DetectorArgs,
    interval_ms: Option<u64>,
    count: Option<u64>,
    no_color: bool,
) -> Result<()> {
    if no_color {
        colored::control::set_override(false);
    }

    let settings = Settings::load(args);
    let engine = Arc::new(
        DetectionEngine::new(settings.detectors.clone())
            .with_suppressions(settings.config.suppressions.clone()),
    );
    let source: Arc<dyn PageSource> = if is_local(target) {
        Arc::new(FilePageSource)
    } else {
        Arc::new(
            HttpPageSource::from_config(&settings.config.source)
                .context("failed to build HTTP client")?,
        )
    };

    let mut options = SessionOptions::from_config(&settings.config.monitor);
    if let Some(ms) = interval_ms {
        options.interval = Duration::from_millis(ms.max(1));
    }

    let (mut session, mut events) =
        MonitoringSession::new(Target::new(target), engine, source, options);
    session.start().context("failed to start monitoring")?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut received: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                output::print_event(&event, format)?;
                received += 1;
                if count.is_some_and(|limit| received >= limit) {
                    break;
                }
            }
        }
    }

    session.shutdown().await;
    if count.is_none_or(|limit| received < limit) {
        // delivered only when `deliver_after_stop` is set
        while let Ok(event) = events.try_recv() {
            output::print_event(&event, format)?;
        }
    }
    Ok(())
}
