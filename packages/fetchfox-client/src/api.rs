//! The seam between job orchestration and the HTTP transport.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{JobId, JobStatus, Workflow, WorkflowId};

/// Operations of the FetchFox workflow/job API.
///
/// [`crate::FetchFoxClient`] implements this over HTTP;
/// [`crate::testing::MockExtractionApi`] serves canned responses.
#[async_trait]
pub trait ExtractionApi: Send + Sync {
    /// `POST /api/v2/workflows`
    async fn create_workflow(&self, workflow: &Workflow) -> Result<WorkflowId>;

    /// `POST /api/v2/workflows/{id}/run`
    async fn run_workflow(&self, workflow_id: &WorkflowId) -> Result<JobId>;

    /// `GET /api/v2/jobs/{id}`
    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus>;

    /// Create the workflow and start a job for it.
    async fn submit(&self, workflow: &Workflow) -> Result<JobId> {
        let workflow_id = self.create_workflow(workflow).await?;
        tracing::debug!(workflow_id = %workflow_id, "Workflow created");

        let job_id = self.run_workflow(&workflow_id).await?;
        tracing::info!(workflow_id = %workflow_id, job_id = %job_id, "Extraction job started");

        Ok(job_id)
    }
}
