//! Bounded job polling with exponential backoff.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::ExtractionApi;
use crate::error::{FetchFoxError, Result};
use crate::types::{JobId, JobResults};

/// Floor for any delay between status checks.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Limits for waiting on a job.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Status checks before giving up (at least one is always made).
    pub max_attempts: u32,
    /// Delay after the first unfinished status check.
    pub initial_interval: Duration,
    /// Upper bound for any single delay.
    pub max_interval: Duration,
    /// Growth factor applied to the delay after each unfinished check.
    pub multiplier: f64,
    /// Overall wall-clock budget, if any.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 120,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(15),
            multiplier: 2.0,
            timeout: Some(Duration::from_secs(900)),
        }
    }
}

impl PollConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The sequence of delays between status checks, never below [`MIN_INTERVAL`].
    pub fn backoff(&self) -> Backoff {
        let max = self.max_interval.max(MIN_INTERVAL);
        Backoff {
            next: self.initial_interval.clamp(MIN_INTERVAL, max),
            max,
            multiplier: self.multiplier.max(1.0),
        }
    }
}

/// Infinite iterator of capped, exponentially growing delays.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    multiplier: f64,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max)
            .min(self.max);
        Some(current)
    }
}

/// Poll `job_id` until the service reports it done, returning its results.
///
/// Gives up with [`FetchFoxError::Timeout`] once `max_attempts` checks were
/// made or the next delay would overrun `timeout`, and with
/// [`FetchFoxError::Cancelled`] as soon as `cancel` fires.
pub async fn await_completion<A>(
    api: &A,
    job_id: &JobId,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<JobResults>
where
    A: ExtractionApi + ?Sized,
{
    let started = Instant::now();
    let max_attempts = config.max_attempts.max(1);
    let mut delays = config.backoff();
    let mut attempt = 0u32;

    let cancelled = || FetchFoxError::Cancelled {
        job_id: job_id.to_string(),
    };

    loop {
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        attempt += 1;
        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            status = api.job_status(job_id) => status?,
        };

        if status.done {
            let results = status.results.unwrap_or_default();
            tracing::info!(
                job_id = %job_id,
                attempt,
                items = results.items.len(),
                "Job done"
            );
            return Ok(results);
        }

        let timed_out = || FetchFoxError::Timeout {
            job_id: job_id.to_string(),
            attempts: attempt,
        };

        if attempt >= max_attempts {
            tracing::warn!(job_id = %job_id, attempt, "Poll attempts exhausted");
            return Err(timed_out());
        }

        let delay = delays.next().unwrap_or(config.max_interval);
        if let Some(timeout) = config.timeout {
            if started.elapsed() + delay > timeout {
                tracing::warn!(job_id = %job_id, attempt, ?timeout, "Poll timeout reached");
                return Err(timed_out());
            }
        }

        tracing::debug!(job_id = %job_id, attempt, ?delay, "Job still running");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractionApi;
    use crate::types::{ExtractedItem, JobStatus};

    fn fast_config() -> PollConfig {
        PollConfig::default()
            .with_initial_interval(Duration::from_secs(1))
            .with_max_interval(Duration::from_secs(15))
            .with_multiplier(2.0)
            .with_timeout(None)
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let delays: Vec<u64> = fast_config().backoff().take(7).map(|d| d.as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 15, 15, 15]);
    }

    #[test]
    fn test_backoff_multiplier_below_one_is_constant() {
        let config = fast_config().with_multiplier(0.5);
        let delays: Vec<u64> = config.backoff().take(3).map(|d| d.as_secs()).collect();
        assert_eq!(delays, vec![1, 1, 1]);
    }

    #[test]
    fn test_backoff_zero_interval_still_grows() {
        let config = fast_config()
            .with_initial_interval(Duration::ZERO)
            .with_max_interval(Duration::ZERO);
        let delays: Vec<Duration> = config.backoff().take(3).collect();
        assert_eq!(delays, vec![MIN_INTERVAL; 3]);

        let config = fast_config().with_initial_interval(Duration::ZERO);
        let delays: Vec<u128> = config.backoff().take(4).map(|d| d.as_millis()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_waits_between_checks() {
        let api = MockExtractionApi::new().with_status(JobStatus::pending());
        let config = fast_config()
            .with_initial_interval(Duration::ZERO)
            .with_max_attempts(5);
        let started = Instant::now();

        let err = await_completion(&api, &JobId::new("job-1"), &config, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchFoxError::Timeout { attempts: 5, .. }));
        // Delays of 1, 2, 4 and 8 ms between the five checks.
        assert!(started.elapsed() >= Duration::from_millis(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_results_once_done() {
        let api = MockExtractionApi::new()
            .with_status(JobStatus::pending())
            .with_status(JobStatus::pending())
            .with_items(vec![ExtractedItem::new().with("meal_name", "Taco")]);

        let results = await_completion(
            &api,
            &JobId::new("job-1"),
            &fast_config(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(results.items.len(), 1);
        assert_eq!(api.status_call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_without_results_is_empty() {
        let api = MockExtractionApi::new().with_status(JobStatus {
            done: true,
            results: None,
        });

        let results = await_completion(
            &api,
            &JobId::new("job-1"),
            &fast_config(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(results.items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let api = MockExtractionApi::new().with_status(JobStatus::pending());
        let config = fast_config().with_max_attempts(3);

        let err = await_completion(&api, &JobId::new("job-1"), &config, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchFoxError::Timeout { attempts: 3, .. }));
        assert_eq!(api.status_call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_when_next_delay_overruns_timeout() {
        let api = MockExtractionApi::new().with_status(JobStatus::pending());
        // Checks at t=0, 1 and 3; the next delay (4s) would end at t=7.
        let config = fast_config().with_timeout(Some(Duration::from_secs(5)));

        let err = await_completion(&api, &JobId::new("job-1"), &config, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchFoxError::Timeout { attempts: 3, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_check() {
        let api = MockExtractionApi::new().with_status(JobStatus::pending());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = await_completion(&api, &JobId::new("job-1"), &fast_config(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchFoxError::Cancelled { .. }));
        assert_eq!(api.status_call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_while_waiting() {
        let api = MockExtractionApi::new().with_status(JobStatus::pending());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(20)).await;
            trigger.cancel();
        });

        let err = await_completion(&api, &JobId::new("job-1"), &fast_config(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchFoxError::Cancelled { .. }));
        // Checks at t=0, 1, 3, 7 and 15 happen before the cancel at t=20.
        assert_eq!(api.status_call_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_error_propagates() {
        let api = MockExtractionApi::new().with_status_error(crate::testing::MockFailure::Parse(
            "expected value at line 1 column 1".into(),
        ));

        let err = await_completion(
            &api,
            &JobId::new("job-1"),
            &fast_config(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(err.is_decode());
    }
}
