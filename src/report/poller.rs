//! Polling controller — drives repeated report status fetches for one job.
//!
//! One spawned task per active job: an immediate first fetch, then
//! fixed-interval fetches until a terminal state. The task owns the attempt
//! counter; consumers observe state through a `watch` channel. Teardown is
//! a shutdown flag: the pending timer never outlives one interval, and an
//! in-flight fetch is allowed to complete with its result discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::PollError;
use crate::report::analysis::Analysis;
use crate::report::fetcher::{FetchOutcome, ReportFetcher};
use crate::report::state::ReportState;

/// Timing and fallback rules for the polling loop.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Interval between fetches after the immediate first one.
    pub interval: Duration,
    /// Attempt count at which an unavailable backend triggers fallback.
    pub max_unavailable_attempts: u32,
    /// Whether fallback synthesis is allowed at all.
    pub fallback_enabled: bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for PollPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_unavailable_attempts: config.max_unavailable_attempts,
            fallback_enabled: config.fallback_enabled,
        }
    }
}

struct PollerInner {
    policy: PollPolicy,
    fetcher: Arc<dyn ReportFetcher>,
    job_id: String,
    /// Synthesized analysis presented when the backend stays unavailable.
    fallback: Arc<Analysis>,
    state_tx: watch::Sender<ReportState>,
    deactivated: AtomicBool,
}

/// Polling controller for a single job identifier.
///
/// Activation spawns the poll loop immediately. Dropping the controller
/// deactivates it, so polling is bound to the job's lifetime.
pub struct ReportPoller {
    inner: Arc<PollerInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReportPoller {
    /// Start polling for `job_id`. Issues one fetch right away, then one
    /// per `policy.interval` until a terminal state is reached.
    pub fn activate(
        policy: PollPolicy,
        fetcher: Arc<dyn ReportFetcher>,
        job_id: impl Into<String>,
        fallback: Arc<Analysis>,
    ) -> Self {
        let job_id = job_id.into();
        let (state_tx, _state_rx) = watch::channel(ReportState::Processing { attempts: 0 });
        let inner = Arc::new(PollerInner {
            policy,
            fetcher,
            job_id,
            fallback,
            state_tx,
            deactivated: AtomicBool::new(false),
        });

        info!(
            job_id = %inner.job_id,
            interval_secs = inner.policy.interval.as_secs_f64(),
            "Report polling started"
        );
        let handle = tokio::spawn(run(Arc::clone(&inner)));
        Self {
            inner,
            task: Mutex::new(Some(handle)),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.inner.job_id
    }

    /// Subscribe to report state changes.
    pub fn subscribe(&self) -> watch::Receiver<ReportState> {
        self.inner.state_tx.subscribe()
    }

    /// Snapshot of the current report state.
    pub fn current(&self) -> ReportState {
        self.inner.state_tx.borrow().clone()
    }

    /// Re-enter polling after a fatal error. Resets the attempt counter to
    /// zero and fetches immediately instead of waiting for the next tick.
    ///
    /// Only the error state is retryable: `Ready` is permanent for this job
    /// identifier, and an active poll needs no retry.
    pub fn retry(&self) -> Result<(), PollError> {
        if self.inner.deactivated.load(Ordering::Relaxed) {
            return Err(PollError::Deactivated {
                job_id: self.inner.job_id.clone(),
            });
        }

        let current = self.current();
        if !current.is_error() {
            return Err(PollError::NotRetryable {
                state: current.label().to_string(),
            });
        }

        info!(job_id = %self.inner.job_id, "Retrying report polling");
        self.inner
            .state_tx
            .send_replace(ReportState::Processing { attempts: 0 });

        // The previous loop already returned on the terminal state.
        let handle = tokio::spawn(run(Arc::clone(&self.inner)));
        let mut task = self.task.lock().expect("poller task lock poisoned");
        *task = Some(handle);
        Ok(())
    }

    /// Stop polling for good. Safe to call more than once. An in-flight
    /// fetch completes on its own and its outcome is discarded.
    pub fn deactivate(&self) {
        if !self.inner.deactivated.swap(true, Ordering::Relaxed) {
            debug!(job_id = %self.inner.job_id, "Report poller deactivated");
        }
        self.task.lock().expect("poller task lock poisoned").take();
    }
}

impl Drop for ReportPoller {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn run(inner: Arc<PollerInner>) {
    let mut tick = tokio::time::interval(inner.policy.interval);
    let mut attempts: u32 = 0;

    loop {
        // First tick completes immediately: one fetch on activation.
        tick.tick().await;
        if inner.deactivated.load(Ordering::Relaxed) {
            return;
        }

        attempts += 1;
        let outcome = inner.fetcher.fetch(&inner.job_id).await;
        if inner.deactivated.load(Ordering::Relaxed) {
            debug!(job_id = %inner.job_id, "Deactivated mid-fetch; outcome discarded");
            return;
        }

        debug!(
            job_id = %inner.job_id,
            attempts,
            outcome = outcome.label(),
            "Report fetch outcome"
        );

        match outcome {
            FetchOutcome::Ready { analysis, pdf_url } => {
                info!(job_id = %inner.job_id, attempts, "Report ready");
                inner
                    .state_tx
                    .send_replace(ReportState::Ready { analysis, pdf_url });
                return;
            }
            FetchOutcome::StillProcessing => {
                inner
                    .state_tx
                    .send_replace(ReportState::Processing { attempts });
            }
            FetchOutcome::BackendUnavailable => {
                if inner.policy.fallback_enabled
                    && attempts >= inner.policy.max_unavailable_attempts
                {
                    // Product-policy stand-in: present a synthesized report
                    // rather than blocking on a backend that is not there.
                    warn!(
                        job_id = %inner.job_id,
                        attempts,
                        "Backend unavailable; presenting synthesized report"
                    );
                    inner.state_tx.send_replace(ReportState::Ready {
                        analysis: Arc::clone(&inner.fallback),
                        pdf_url: None,
                    });
                    return;
                }
                inner
                    .state_tx
                    .send_replace(ReportState::Processing { attempts });
            }
            FetchOutcome::Fatal { message } => {
                warn!(job_id = %inner.job_id, attempts, %message, "Report fetch failed");
                inner.state_tx.send_replace(ReportState::Error { message });
                return;
            }
        }
    }
}
