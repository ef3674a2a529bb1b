//! Unified report state exposed to consumers of the polling controller.

use std::sync::Arc;

use crate::report::analysis::Analysis;

/// Current state of report generation for one job.
///
/// A tagged sum type, handled exhaustively at the display boundary — an
/// analysis can only exist alongside a `Ready` tag, never next to a
/// "processing" status.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportState {
    /// Still waiting on the backend; `attempts` counts fetches so far.
    Processing { attempts: u32 },
    /// Report is available. `pdf_url` is a download reference when the
    /// backend supplied one.
    Ready {
        analysis: Arc<Analysis>,
        pdf_url: Option<String>,
    },
    /// A fatal failure; the message is user-presentable.
    Error { message: String },
}

impl ReportState {
    /// Terminal states stop the polling controller for good (`Error` can
    /// only be left through an explicit retry).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Error { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Processing { .. } => "processing",
            Self::Ready { .. } => "ready",
            Self::Error { .. } => "error",
        }
    }
}

impl std::fmt::Display for ReportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
