//! Mock implementation of [`ExtractionApi`] for testing.
//!
//! Lets applications exercise submit/poll/normalize flows without a network.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::api::ExtractionApi;
use crate::error::{FetchFoxError, Result};
use crate::types::{ExtractedItem, JobId, JobStatus, Workflow, WorkflowId};

/// Which API call a configured failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockStage {
    CreateWorkflow,
    RunWorkflow,
    JobStatus,
}

/// A failure the mock returns instead of a response.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Network(String),
    Api { status: u16, message: String },
    Parse(String),
    MissingId,
}

impl MockFailure {
    fn into_error(self, stage: MockStage) -> FetchFoxError {
        match self {
            MockFailure::Network(msg) => FetchFoxError::Network(msg),
            MockFailure::Api { status, message } => FetchFoxError::Api { status, message },
            MockFailure::Parse(msg) => FetchFoxError::Parse(msg),
            MockFailure::MissingId => FetchFoxError::MissingId(match stage {
                MockStage::CreateWorkflow => "workflow id",
                _ => "job id",
            }),
        }
    }
}

/// Record of a call made to the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockApiCall {
    CreateWorkflow,
    RunWorkflow { workflow_id: String },
    JobStatus { job_id: String },
}

/// Mock extraction API.
///
/// Job status responses are served in the order they were added; the last
/// one repeats. With none configured, the job never finishes.
///
/// # Example
///
/// ```rust
/// use fetchfox_client::testing::MockExtractionApi;
/// use fetchfox_client::{ExtractedItem, JobStatus};
///
/// let api = MockExtractionApi::new()
///     .with_status(JobStatus::pending())
///     .with_items(vec![ExtractedItem::new().with("meal_name", "Taco")]);
/// ```
#[derive(Default)]
pub struct MockExtractionApi {
    statuses: Arc<RwLock<VecDeque<JobStatus>>>,
    failures: Arc<RwLock<HashMap<MockStage, MockFailure>>>,
    workflows: Arc<RwLock<Vec<Workflow>>>,
    calls: Arc<RwLock<Vec<MockApiCall>>>,
}

impl MockExtractionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job status response (builder pattern).
    pub fn with_status(self, status: JobStatus) -> Self {
        self.statuses.write().unwrap().push_back(status);
        self
    }

    /// Queue a finished job carrying `items` (builder pattern).
    pub fn with_items(self, items: Vec<ExtractedItem>) -> Self {
        self.with_status(JobStatus::finished(items))
    }

    /// Make the given call fail (builder pattern).
    pub fn with_failure(self, stage: MockStage, failure: MockFailure) -> Self {
        self.failures.write().unwrap().insert(stage, failure);
        self
    }

    /// Make every job status call fail (builder pattern).
    pub fn with_status_error(self, failure: MockFailure) -> Self {
        self.with_failure(MockStage::JobStatus, failure)
    }

    /// Workflows received by `create_workflow`.
    pub fn submitted_workflows(&self) -> Vec<Workflow> {
        self.workflows.read().unwrap().clone()
    }

    /// All calls, in order.
    pub fn calls(&self) -> Vec<MockApiCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of job status calls made.
    pub fn status_call_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockApiCall::JobStatus { .. }))
            .count()
    }

    fn failure(&self, stage: MockStage) -> Option<FetchFoxError> {
        self.failures
            .read()
            .unwrap()
            .get(&stage)
            .cloned()
            .map(|failure| failure.into_error(stage))
    }

    fn record(&self, call: MockApiCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl ExtractionApi for MockExtractionApi {
    async fn create_workflow(&self, workflow: &Workflow) -> Result<WorkflowId> {
        self.record(MockApiCall::CreateWorkflow);
        self.workflows.write().unwrap().push(workflow.clone());

        match self.failure(MockStage::CreateWorkflow) {
            Some(err) => Err(err),
            None => Ok(WorkflowId::new("wf-mock")),
        }
    }

    async fn run_workflow(&self, workflow_id: &WorkflowId) -> Result<JobId> {
        self.record(MockApiCall::RunWorkflow {
            workflow_id: workflow_id.to_string(),
        });

        match self.failure(MockStage::RunWorkflow) {
            Some(err) => Err(err),
            None => Ok(JobId::new("job-mock")),
        }
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus> {
        self.record(MockApiCall::JobStatus {
            job_id: job_id.to_string(),
        });

        if let Some(err) = self.failure(MockStage::JobStatus) {
            return Err(err);
        }

        let mut statuses = self.statuses.write().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };

        Ok(status.unwrap_or_else(JobStatus::pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_creates_then_runs() {
        let api = MockExtractionApi::new();
        let workflow = Workflow::builder("https://example.com").build();

        let job_id = api.submit(&workflow).await.unwrap();

        assert_eq!(job_id.as_str(), "job-mock");
        assert_eq!(
            api.calls(),
            vec![
                MockApiCall::CreateWorkflow,
                MockApiCall::RunWorkflow {
                    workflow_id: "wf-mock".into()
                },
            ]
        );
        assert_eq!(api.submitted_workflows().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_stops_at_create_failure() {
        let api = MockExtractionApi::new().with_failure(MockStage::CreateWorkflow, MockFailure::MissingId);
        let workflow = Workflow::builder("https://example.com").build();

        let err = api.submit(&workflow).await.unwrap_err();

        assert!(matches!(err, FetchFoxError::MissingId("workflow id")));
        assert_eq!(api.calls(), vec![MockApiCall::CreateWorkflow]);
    }

    #[tokio::test]
    async fn test_last_status_repeats() {
        let api = MockExtractionApi::new()
            .with_status(JobStatus::pending())
            .with_items(vec![]);
        let job = JobId::new("job-mock");

        assert!(!api.job_status(&job).await.unwrap().done);
        assert!(api.job_status(&job).await.unwrap().done);
        assert!(api.job_status(&job).await.unwrap().done);
    }
}
