//! Bounded-concurrency admission control
//!
//! The gate admits at most `limit` tasks at once. Excess submissions wait on
//! tokio's fair semaphore, which hands out permits in FIFO order. Every
//! admitted task races a timeout; when the timeout wins, the task's future is
//! dropped (cancelling any request it owns) and its slot is released
//! immediately.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Errors returned by [`RateGate::submit`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
}

/// Owned admission gate for one crawl (or any group of callers sharing a budget)
#[derive(Debug)]
pub struct RateGate {
    semaphore: Semaphore,
    limit: usize,
    timeout: Duration,
}

impl RateGate {
    /// Creates a gate admitting `limit` concurrent tasks, each bounded by `timeout`
    ///
    /// A limit of zero is raised to one so submissions can always make progress.
    pub fn new(limit: usize, timeout: Duration) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Semaphore::new(limit),
            limit,
            timeout,
        }
    }

    /// Maximum number of tasks admitted at once
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Per-task timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `task` once a slot is free, bounded by the gate's timeout
    ///
    /// The timeout starts when the task is admitted, not when it is queued.
    /// A failing or timed-out task never affects other submissions.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use thread_harvest::crawler::RateGate;
    ///
    /// # async fn example() {
    /// let gate = RateGate::new(3, Duration::from_secs(30));
    /// let value = gate.submit(|| async { 21 * 2 }).await.unwrap();
    /// assert_eq!(value, 42);
    /// # }
    /// ```
    pub async fn submit<F, Fut, T>(&self, task: F) -> Result<T, GateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // The semaphore is owned by the gate and never closed
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("rate gate semaphore is never closed");

        tokio::time::timeout(self.timeout, task())
            .await
            .map_err(|_| GateError::Timeout(self.timeout))
    }
}
