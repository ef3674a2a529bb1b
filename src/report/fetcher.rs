//! Report status fetching and outcome classification.
//!
//! One fetch = one `GET /report/{jobId}` call, classified into
//! `FetchOutcome`. The fetcher never returns a `Result` — every failure
//! mode has a classification, and the polling controller decides what each
//! one means for the report state.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::report::analysis::Analysis;

/// Classified result of one status fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The backend declared the report ready. The attached analysis is the
    /// locally synthesized one — whatever the backend sent is discarded.
    Ready {
        analysis: Arc<Analysis>,
        pdf_url: Option<String>,
    },
    /// The backend answered but the report is not ready yet.
    StillProcessing,
    /// Missing endpoint (404), server fault (5xx), or a transport-level
    /// failure. Presumed transient; absorbed by the fallback policy.
    BackendUnavailable,
    /// Any other failure. Surfaced to the user with a retry affordance.
    Fatal { message: String },
}

impl FetchOutcome {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::StillProcessing => "still_processing",
            Self::BackendUnavailable => "backend_unavailable",
            Self::Fatal { .. } => "fatal",
        }
    }
}

/// One status check for a job. Stateless across calls.
#[async_trait]
pub trait ReportFetcher: Send + Sync {
    async fn fetch(&self, job_id: &str) -> FetchOutcome;
}

/// Status endpoint response body.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
    #[serde(default)]
    #[allow(dead_code)] // informational only; fatal errors carry raw body text
    message: Option<String>,
    #[serde(default)]
    pdf_url: Option<String>,
}

/// HTTP implementation of `ReportFetcher` against the backend status
/// endpoint.
pub struct HttpReportFetcher {
    client: reqwest::Client,
    base_url: String,
    /// Synthesized once at construction; attached to every `Ready` outcome.
    analysis: Arc<Analysis>,
}

impl HttpReportFetcher {
    pub fn new(base_url: impl Into<String>, analysis: Arc<Analysis>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, analysis)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        analysis: Arc<Analysis>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            analysis,
        }
    }

    fn status_url(&self, job_id: &str) -> String {
        format!("{}/report/{job_id}", self.base_url)
    }
}

/// 404 and 5xx signal an absent or faulting backend, not a client mistake.
fn is_unavailable_status(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status.is_server_error()
}

#[async_trait]
impl ReportFetcher for HttpReportFetcher {
    async fn fetch(&self, job_id: &str) -> FetchOutcome {
        let response = match self.client.get(self.status_url(job_id)).send().await {
            Ok(r) => r,
            Err(e) => {
                // Connection/DNS failures are treated like an absent
                // endpoint: both are presumed-transient backend issues.
                debug!(job_id, error = %e, "Report status transport failure");
                return FetchOutcome::BackendUnavailable;
            }
        };

        let status = response.status();
        if is_unavailable_status(status) {
            debug!(job_id, %status, "Report endpoint unavailable");
            return FetchOutcome::BackendUnavailable;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(job_id, %status, "Report status check failed");
            return FetchOutcome::Fatal {
                message: format!("HTTP {status}: {body}"),
            };
        }

        let body: StatusBody = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!(job_id, error = %e, "Malformed report status body");
                return FetchOutcome::Fatal {
                    message: format!("Malformed report status response: {e}"),
                };
            }
        };

        if body.status == "ready" {
            FetchOutcome::Ready {
                analysis: Arc::clone(&self.analysis),
                pdf_url: body.pdf_url,
            }
        } else {
            // "processing", a declared "error", or anything unexpected:
            // keep waiting.
            FetchOutcome::StillProcessing
        }
    }
}
