//! Pure FetchFox REST API client.
//!
//! A minimal client for the FetchFox workflow API. Supports creating
//! extraction workflows, starting jobs, and polling them to completion.
//!
//! # Example
//!
//! ```rust,ignore
//! use fetchfox_client::{FetchFoxClient, PollConfig, Workflow};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = FetchFoxClient::new(api_key)?.with_host("https://fetchfox.ai");
//!
//! let workflow = Workflow::builder("https://example.com/menu")
//!     .question("meal_name", "What is the name of this meal? If unavailable, answer NA.")
//!     .build();
//!
//! let results = client
//!     .extract(&workflow, &PollConfig::default(), &CancellationToken::new())
//!     .await?;
//! for item in &results.items {
//!     println!("{}", item.answer_or_na("meal_name"));
//! }
//! ```

pub mod api;
pub mod error;
pub mod poll;
pub mod testing;
pub mod types;

pub use api::ExtractionApi;
pub use error::{FetchFoxError, Result};
pub use poll::{await_completion, Backoff, PollConfig};
pub use types::{
    ExtractMode, ExtractedItem, JobId, JobResults, JobStatus, PageView, Workflow,
    WorkflowBuilder, WorkflowId, DEFAULT_MAX_PAGES, NOT_FOUND,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use types::{CreateWorkflowResponse, RawId, RunWorkflowResponse};

pub const DEFAULT_HOST: &str = "https://fetchfox.ai";

/// Pure FetchFox API client.
#[derive(Clone)]
pub struct FetchFoxClient {
    http_client: Client,
    api_key: String,
    host: String,
}

impl FetchFoxClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, Duration::from_secs(60))
    }

    /// Create a new client whose HTTP requests time out after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchFoxError::Config("API key is empty".into()));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchFoxError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            host: DEFAULT_HOST.to_string(),
        })
    }

    /// Set a custom host (staging, mock servers).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Submit `workflow`, wait for its job, and return the results.
    pub async fn extract(
        &self,
        workflow: &Workflow,
        poll: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<JobResults> {
        tracing::info!(url = workflow.url().unwrap_or_default(), "Submitting extraction workflow");

        let job_id = self.submit(workflow).await?;
        await_completion(self, &job_id, poll, cancel).await
    }

    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let url = format!("{}{}", self.host, path);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = format!("{}{}", self.host, path);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchFoxError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| FetchFoxError::Parse(format!("Failed to deserialize response: {}", e)))
    }
}

#[async_trait]
impl ExtractionApi for FetchFoxClient {
    async fn create_workflow(&self, workflow: &Workflow) -> Result<WorkflowId> {
        let resp: CreateWorkflowResponse = self.post("/api/v2/workflows", workflow).await?;
        resp.id
            .and_then(RawId::into_string)
            .map(WorkflowId::new)
            .ok_or(FetchFoxError::MissingId("workflow id"))
    }

    async fn run_workflow(&self, workflow_id: &WorkflowId) -> Result<JobId> {
        let path = format!("/api/v2/workflows/{}/run", workflow_id);
        let resp: RunWorkflowResponse = self.post(&path, &serde_json::json!({})).await?;
        resp.job_id
            .and_then(RawId::into_string)
            .map(JobId::new)
            .ok_or(FetchFoxError::MissingId("job id"))
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus> {
        self.get(&format!("/api/v2/jobs/{}", job_id)).await
    }
}
