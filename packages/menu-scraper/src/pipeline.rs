//! Submit → poll → normalize for one URL.

use fetchfox_client::{
    await_completion, ExtractMode, ExtractionApi, PageView, PollConfig, Workflow,
    DEFAULT_MAX_PAGES,
};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, ScrapeError};
use crate::normalize::normalize;
use crate::questions::QuestionSet;

/// Runs question sets against single URLs through an [`ExtractionApi`].
pub struct Scraper<A> {
    api: A,
    poll: PollConfig,
    max_pages: u32,
    cancel: CancellationToken,
}

impl<A: ExtractionApi> Scraper<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            poll: PollConfig::default(),
            max_pages: DEFAULT_MAX_PAGES,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Stop waiting on the job when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The workflow submitted for `set` against `url`.
    pub fn workflow<S: QuestionSet>(&self, set: &S, url: &str) -> Workflow {
        Workflow::builder(url)
            .questions(set.questions().iter().copied())
            .mode(ExtractMode::Multiple)
            .view(PageView::Html)
            .max_pages(self.max_pages)
            .build()
    }

    /// Extract `set` from `url` and return the normalized records.
    ///
    /// Fails with [`ScrapeError::EmptyResult`] when the job returns no items
    /// or none of them has a usable name.
    pub async fn scrape<S: QuestionSet>(&self, set: &S, url: &str) -> Result<Vec<S::Record>> {
        let workflow = self.workflow(set, url);

        let job_id = self.api.submit(&workflow).await?;
        let results = await_completion(&self.api, &job_id, &self.poll, &self.cancel).await?;

        if results.items.is_empty() {
            tracing::warn!(url, job_id = %job_id, "Job returned no items");
            return Err(ScrapeError::EmptyResult(S::NO_ITEMS));
        }

        let records = normalize(set, &results.items);
        tracing::info!(
            url,
            job_id = %job_id,
            items = results.items.len(),
            records = records.len(),
            "Normalized extraction results"
        );

        if records.is_empty() {
            return Err(ScrapeError::EmptyResult(S::NO_VALID_ITEMS));
        }

        Ok(records)
    }
}
