//! Report generation: score synthesis, status fetching, and polling.

pub mod analysis;
pub mod content;
pub mod fetcher;
pub mod poller;
pub mod state;

pub use analysis::{Analysis, ScoreSet, VisualProfile, synthesize};
pub use fetcher::{FetchOutcome, HttpReportFetcher, ReportFetcher};
pub use poller::{PollPolicy, ReportPoller};
pub use state::ReportState;
