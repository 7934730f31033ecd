use std::future::Future;
use std::time::Duration;

use crate::TranscriptError;

use super::FetchError;

/// Bounded retry policy for caption fetches.
///
/// Only transient failures are retried; a fatal failure aborts on the spot.
/// Delay between attempts doubles from `base_delay` (attempt n waits
/// `base_delay * 2^(n-1)`).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds, fails fatally, or the attempt
    /// budget is exhausted.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, TranscriptError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut last = String::new();

        for attempt in 1..=self.max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(FetchError::Fatal(err)) => return Err(err),
                Err(FetchError::Transient(reason)) => {
                    tracing::warn!(
                        "Transient fetch failure (attempt {}/{}): {}",
                        attempt,
                        self.max_attempts,
                        reason
                    );
                    last = reason;
                }
            }

            if attempt < self.max_attempts {
                let backoff = self.base_delay * (1u32 << (attempt - 1));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(TranscriptError::FetchExhausted {
            attempts: self.max_attempts,
            last,
        })
    }
}
