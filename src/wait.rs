//! Bounded polling.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// How long a single page operation may wait, unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often a condition is re-checked while waiting.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(250);

/// A polling loop with a fixed maximum duration.
///
/// The condition is always checked at least once, even with a zero timeout. Time is measured
/// with tokio's clock, so tests can pause and advance it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wait {
    timeout: Duration,
    period: Duration,
}

impl Default for Wait {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Wait {
    /// Wait at most `timeout`, polling every [`DEFAULT_PERIOD`].
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            period: DEFAULT_PERIOD,
        }
    }

    /// Poll every `period` instead.
    pub fn every(self, period: Duration) -> Self {
        Self { period, ..self }
    }

    /// The maximum wait.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `condition` until it yields `Some`, or the timeout passes.
    ///
    /// On timeout, returns how long was actually waited.
    pub async fn until<F, FF, R>(&self, mut condition: F) -> Result<R, Duration>
    where
        F: FnMut() -> FF,
        FF: Future<Output = Option<R>>,
    {
        let start = Instant::now();
        let deadline = start + self.timeout;

        loop {
            if let Some(result) = condition().await {
                return Ok(result);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(now - start);
            }
            tokio::time::sleep(self.period.min(deadline - now)).await;
        }
    }
}
