//! Bounded concurrency for external generation jobs.
//!
//! Every spawn acquires a permit first, so no more than `max_jobs` model
//! processes run at the same time. Waiting for a permit is asynchronous.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::executor::ProcessError;

/// Default number of generation processes allowed to run concurrently.
pub const DEFAULT_MAX_JOBS: usize = 4;

/// Shared, cheaply cloneable job limiter.
#[derive(Debug, Clone)]
pub struct JobLimiter {
    permits: Arc<Semaphore>,
    max_jobs: usize,
}

impl JobLimiter {
    /// Create a limiter allowing `max_jobs` concurrent jobs (at least one).
    pub fn new(max_jobs: usize) -> Self {
        let max_jobs = max_jobs.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_jobs)),
            max_jobs,
        }
    }

    /// Wait for a free slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ProcessError> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ProcessError::LimiterClosed)
    }

    /// Stop handing out permits. Jobs already running keep theirs; queued
    /// and later callers get [`ProcessError::LimiterClosed`].
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }

    /// Number of jobs currently holding a permit.
    pub fn active_jobs(&self) -> usize {
        self.max_jobs - self.permits.available_permits()
    }
}

impl Default for JobLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_JOBS)
    }
}
