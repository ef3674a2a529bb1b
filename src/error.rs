//! Error types for the PsyCanvas client.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Polling error: {0}")]
    Poll(#[from] PollError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Backend API errors for the upload and survey endpoints.
///
/// The report status endpoint never surfaces errors through this type —
/// its failures are classified into `report::FetchOutcome` instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Upload response did not contain a task_id")]
    MissingTaskId,

    #[error("Invalid drawing {name}: {reason}")]
    InvalidDrawing { name: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Polling controller errors.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Cannot retry from state {state}: only an error state is retryable")]
    NotRetryable { state: String },

    #[error("Poller for job {job_id} has been deactivated")]
    Deactivated { job_id: String },
}

/// Wizard step sequencing errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Cannot move from step {from} to step {to}")]
    InvalidTransition { from: String, to: String },

    #[error("No job identifier — the upload step has not completed")]
    MissingJobId,
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
