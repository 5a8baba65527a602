//! Where the dashboard gets its reports: the HTTP API, or an in-process
//! `CoreState` when running standalone.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::core_state::{CoreError, CoreState};
use crate::decision::{analyze_by_id, AnalysisReport};
use crate::inquiry::{inquiry_by_sentence, InquiryReport};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{detail} (status {status})")]
    Status { status: u16, detail: String },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Short message shown to the dashboard user.
    pub fn notice(&self) -> String {
        match self {
            Self::Status { status: 404, detail } => detail.clone(),
            Self::Status { detail, .. } => format!("Request failed: {detail}"),
            Self::Transport(_) => "The analysis service is unreachable".to_string(),
            Self::Decode(_) => "The analysis service returned an unexpected response".to_string(),
        }
    }
}

/// Blocking calls into the analysis service.
pub trait DashboardBackend {
    fn analyze(&self, patient_id: &str) -> Result<AnalysisReport, BackendError>;
    fn inquiry(&self, query: &str) -> Result<InquiryReport, BackendError>;
}

/// Talks to a running API server.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl HttpBackend {
    /// Builds a blocking client; call from a blocking context.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.detail)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json()
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl DashboardBackend for HttpBackend {
    fn analyze(&self, patient_id: &str) -> Result<AnalysisReport, BackendError> {
        // Always a string: "007" must not become 7.
        self.post("/analyze", &serde_json::json!({ "patient_id": patient_id }))
    }

    fn inquiry(&self, query: &str) -> Result<InquiryReport, BackendError> {
        self.post("/hospital/inquiry", &serde_json::json!({ "query": query }))
    }
}

/// Calls the handlers directly against shared state.
pub struct LocalBackend {
    core: Arc<CoreState>,
}

impl LocalBackend {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

fn local_error(err: CoreError) -> BackendError {
    match err {
        CoreError::PatientNotFound(_) => BackendError::Status {
            status: 404,
            detail: "Patient not found".to_string(),
        },
        other => {
            tracing::error!(error = %other, "Dashboard request failed");
            BackendError::Status {
                status: 500,
                detail: "An internal error occurred".to_string(),
            }
        }
    }
}

impl DashboardBackend for LocalBackend {
    fn analyze(&self, patient_id: &str) -> Result<AnalysisReport, BackendError> {
        analyze_by_id(&self.core, patient_id).map_err(local_error)
    }

    fn inquiry(&self, query: &str) -> Result<InquiryReport, BackendError> {
        inquiry_by_sentence(&self.core, query).map_err(local_error)
    }
}
