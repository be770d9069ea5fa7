//! Periodic re-evaluation of one target.
//!
//! A session is an explicit state machine:
//!
//! ```text
//! Idle --tick--> Scanning --report--> Idle
//!   \               |
//!    +----stop------+----> Stopped (terminal)
//! ```
//!
//! One tokio task per session drives the loop. The task awaits every scan
//! before waiting for the next tick, so two scans of the same session never
//! overlap; ticks missed during a slow fetch are skipped.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use darkux_guard::config::{MonitorConfig, DEFAULT_INTERVAL_MS};
use darkux_guard::report::DetectionReport;
use darkux_guard::Target;
use darkux_guard_detectors::DetectionEngine;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::source::PageSource;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Scanning,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub interval: Duration,
    /// Deliver the report of a scan that was in flight when the session stopped.
    pub deliver_after_stop: bool,
    /// Capacity of the event channel.
    pub channel_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            deliver_after_stop: false,
            channel_capacity: 16,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            deliver_after_stop: config.deliver_after_stop,
            ..Self::default()
        }
    }
}

/// One completed scan.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    /// 1-based, increasing in initiation order.
    pub sequence: u64,
    pub report: Arc<DetectionReport>,
    /// The session was stopped while this scan was in flight.
    pub after_stop: bool,
    /// The page digest differs from the previous successful scan.
    pub changed: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has been stopped and cannot be restarted")]
    Stopped,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<SessionState>,
    last_report: Mutex<Option<Arc<DetectionReport>>>,
}

impl Shared {
    fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `next` unless the session already stopped.
    fn advance(&self, next: SessionState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != SessionState::Stopped {
            *state = next;
        }
    }

    /// Returns the previous state.
    fn stop(&self) -> SessionState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *state, SessionState::Stopped)
    }

    fn store(&self, report: Arc<DetectionReport>) {
        *self.last_report.lock().unwrap_or_else(PoisonError::into_inner) = Some(report);
    }

    fn last_report(&self) -> Option<Arc<DetectionReport>> {
        self.last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Drives periodic scans of one target and emits a [`ScanEvent`] per scan.
pub struct MonitoringSession {
    target: Target,
    engine: Arc<DetectionEngine>,
    source: Arc<dyn PageSource>,
    options: SessionOptions,
    shared: Arc<Shared>,
    cancel: CancellationToken,
    events: Option<mpsc::Sender<ScanEvent>>,
    task: Option<JoinHandle<()>>,
}

impl MonitoringSession {
    /// Create an idle session and the receiving end of its event channel.
    pub fn new(
        target: Target,
        engine: Arc<DetectionEngine>,
        source: Arc<dyn PageSource>,
        mut options: SessionOptions,
    ) -> (Self, mpsc::Receiver<ScanEvent>) {
        // a zero period would make the interval timer panic
        options.interval = options.interval.max(MIN_INTERVAL);
        let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
        let session = Self {
            target,
            engine,
            source,
            options,
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState::Idle),
                last_report: Mutex::new(None),
            }),
            cancel: CancellationToken::new(),
            events: Some(tx),
            task: None,
        };
        (session, rx)
    }

    /// Scan immediately, then on every interval tick. Returns `Ok(false)`
    /// when the session is already running.
    pub fn start(&mut self) -> Result<bool, SessionError> {
        if self.shared.state() == SessionState::Stopped {
            return Err(SessionError::Stopped);
        }
        let Some(events) = self.events.take() else {
            debug!(page = %self.target, "session already running");
            return Ok(false);
        };

        info!(
            page = %self.target,
            interval_ms = self.options.interval.as_millis() as u64,
            "monitoring started"
        );
        let scan_loop = ScanLoop {
            target: self.target.clone(),
            engine: Arc::clone(&self.engine),
            source: Arc::clone(&self.source),
            options: self.options.clone(),
            shared: Arc::clone(&self.shared),
            cancel: self.cancel.clone(),
            events,
        };
        self.task = Some(tokio::spawn(scan_loop.run()));
        Ok(true)
    }

    /// Stop the session. A fetch in flight runs to completion but starts
    /// nothing after it. Returns false when the session was already stopped.
    pub fn stop(&mut self) -> bool {
        let previous = self.shared.stop();
        self.cancel.cancel();
        // never started: close the channel so receivers see the end
        self.events.take();
        if previous == SessionState::Stopped {
            return false;
        }
        info!(page = %self.target, ?previous, "monitoring stopped");
        true
    }

    /// Stop and wait for the scan task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(page = %self.target, error = %err, "scan task ended abnormally");
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn last_report(&self) -> Option<Arc<DetectionReport>> {
        self.shared.last_report()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Everything the spawned task owns.
struct ScanLoop {
    target: Target,
    engine: Arc<DetectionEngine>,
    source: Arc<dyn PageSource>,
    options: SessionOptions,
    shared: Arc<Shared>,
    cancel: CancellationToken,
    events: mpsc::Sender<ScanEvent>,
}

impl ScanLoop {
    async fn run(self) {
        let mut ticker = tokio::time::interval(self.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sequence: u64 = 0;
        let mut last_digest: Option<String> = None;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            self.shared.advance(SessionState::Scanning);
            let report = self.scan().await;

            let after_stop = self.cancel.is_cancelled();
            if after_stop && !self.options.deliver_after_stop {
                debug!(page = %self.target, "stopped during scan; report discarded");
                break;
            }

            let changed = match report.page_digest() {
                Some(digest) => {
                    let changed = last_digest.as_deref() != Some(digest);
                    last_digest = Some(digest.to_string());
                    changed
                }
                None => false,
            };

            sequence += 1;
            let report = Arc::new(report);
            self.shared.store(Arc::clone(&report));
            self.shared.advance(SessionState::Idle);

            let event = ScanEvent {
                sequence,
                report,
                after_stop,
                changed,
            };
            if after_stop {
                // already cancelled, so never wait for room
                if let Err(err) = self.events.try_send(event) {
                    debug!(page = %self.target, error = %err, "report after stop not delivered");
                }
                break;
            }
            let delivered = tokio::select! {
                biased;
                sent = self.events.send(event) => sent.is_ok(),
                _ = self.cancel.cancelled() => {
                    debug!(page = %self.target, "stopped while the channel was full; report discarded");
                    break;
                }
            };
            if !delivered {
                debug!(page = %self.target, "event receiver dropped; ending session");
                self.shared.stop();
                break;
            }
        }

        debug!(page = %self.target, scans = sequence, "scan loop exited");
    }

    async fn scan(&self) -> DetectionReport {
        match self.source.fetch(&self.target).await {
            Ok(page) => self.engine.run(Some(&self.target), &page),
            Err(failure) => {
                warn!(page = %self.target, error = %failure, "fetch failed");
                self.engine.failure_report(Some(&self.target), &failure)
            }
        }
    }
}
