//! Backend API client for the upload and survey endpoints.
//!
//! The report status endpoint lives in `report::fetcher` with its own
//! outcome classification; these two calls fail loudly instead.

use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::error::ApiError;
use crate::questionnaire::QuestionnaireAnswers;

/// Per-file size cap enforced before upload.
pub const MAX_DRAWING_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// One drawing queued for upload.
#[derive(Debug, Clone)]
pub struct DrawingFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DrawingFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Client-side checks mirroring the form's validation: jpg, jpeg, png
    /// or gif, non-empty, at most 5 MB.
    pub fn validate(&self) -> Result<(), ApiError> {
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::InvalidDrawing {
                name: self.file_name.clone(),
                reason: "only JPEG, PNG and GIF images are accepted".into(),
            });
        }
        if self.bytes.is_empty() {
            return Err(ApiError::InvalidDrawing {
                name: self.file_name.clone(),
                reason: "file is empty".into(),
            });
        }
        if self.bytes.len() > MAX_DRAWING_BYTES {
            return Err(ApiError::InvalidDrawing {
                name: self.file_name.clone(),
                reason: format!("file exceeds {} bytes", MAX_DRAWING_BYTES),
            });
        }
        Ok(())
    }
}

/// Client for the upload and survey submission endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Upload the three drawings (house, animal, self-portrait) and return
    /// the job identifier the backend assigned.
    pub async fn upload_drawings(
        &self,
        house: DrawingFile,
        animal: DrawingFile,
        portrait: DrawingFile,
    ) -> Result<String, ApiError> {
        for file in [&house, &animal, &portrait] {
            file.validate()?;
        }

        let mut form = Form::new();
        for file in [house, animal, portrait] {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.file_name));
        }

        let endpoint = self.endpoint("upload");
        let response = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| ApiError::RequestFailed {
                    endpoint: endpoint.clone(),
                    reason: format!("invalid JSON response: {e}"),
                })?;

        let task_id = body
            .get("task_id")
            .and_then(serde_json::Value::as_str)
            .ok_or(ApiError::MissingTaskId)?;

        info!(task_id, "Drawings uploaded");
        Ok(task_id.to_string())
    }

    /// Submit the questionnaire for a job.
    pub async fn submit_survey(
        &self,
        job_id: &str,
        answers: &QuestionnaireAnswers,
    ) -> Result<(), ApiError> {
        let endpoint = self.endpoint("submit-survey");
        let response = self
            .client
            .post(&endpoint)
            .json(&answers.to_survey_payload(job_id))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        info!(job_id, "Survey submitted");
        Ok(())
    }
}
