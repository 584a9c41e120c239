//! Bounded concurrent execution of per-repository jobs.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Number of available cores, or 4 when that cannot be determined.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

/// Runs one job per input with at most `concurrency` in flight.
///
/// Jobs that spawn git rely on `kill_on_drop`: cancelling the pool aborts
/// the jobs and thereby kills their children.
#[derive(Debug, Clone)]
pub struct ProbePool {
    concurrency: usize,
    cancel: CancellationToken,
}

impl Default for ProbePool {
    fn default() -> Self {
        Self::new(default_concurrency())
    }
}

impl ProbePool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run `job` for every input and return the outputs in input order.
    ///
    /// Returns [`Error::Cancelled`] as soon as the token fires, and
    /// [`Error::Join`] if a job panics.
    pub async fn run<I, T, F, Fut>(&self, inputs: Vec<I>, job: F) -> Result<Vec<T>>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let total = inputs.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut set = JoinSet::new();
        for (position, input) in inputs.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let work = job(input);
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (position, work.await)
            });
        }

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::warn!(pending = set.len(), "Cancelled, aborting remaining jobs");
                    set.abort_all();
                    return Err(Error::Cancelled);
                }
                next = set.join_next() => match next {
                    Some(Ok((position, output))) => slots[position] = Some(output),
                    Some(Err(e)) => {
                        set.abort_all();
                        return Err(Error::Join(e));
                    }
                    None => break,
                },
            }
        }

        tracing::debug!(jobs = total, concurrency = self.concurrency, "Pool finished");
        Ok(slots.into_iter().flatten().collect())
    }
}
