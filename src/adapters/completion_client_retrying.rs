//! Bounded retries with exponential backoff around a completion client.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::domain::{AppError, CompletionConfig};
use crate::ports::{CompletionClient, CompletionRequest};

const MAX_DELAY_MS: u64 = 30_000;
/// Doublings applied to the base delay before the cap takes over.
const MAX_BACKOFF_DOUBLINGS: u32 = 6;

/// How many attempts a completion call gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &CompletionConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay_ms: config.retry_delay_ms.max(1),
            max_delay_ms: MAX_DELAY_MS.max(config.retry_delay_ms),
        }
    }

    /// Wait before attempt `failed_attempt + 1`.
    ///
    /// A `Retry-After` hint from the service wins over the computed backoff.
    /// Otherwise the base delay doubles per failed attempt, plus up to 25% jitter.
    fn delay_after(&self, failed_attempt: u32, error: &AppError) -> Duration {
        if let Some(hint_ms) = error.retry_after_ms() {
            return Duration::from_millis(hint_ms.min(self.max_delay_ms));
        }

        let doublings = failed_attempt.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
        let backoff_ms = (self.base_delay_ms << doublings).min(self.max_delay_ms);
        let delay_ms = backoff_ms.saturating_add(jitter_ms(backoff_ms / 4));
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

/// Decorator that repeats transient failures of the wrapped client.
pub struct RetryingCompletionClient {
    inner: Box<dyn CompletionClient>,
    policy: RetryPolicy,
}

impl RetryingCompletionClient {
    pub fn new(inner: Box<dyn CompletionClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl CompletionClient for RetryingCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AppError> {
        let mut attempt = 1;
        loop {
            let error = match self.inner.complete(request) {
                Ok(reply) => return Ok(reply),
                Err(error) => error,
            };
            if !error.is_transient() || attempt >= self.policy.max_attempts {
                return Err(error);
            }

            let delay = self.policy.delay_after(attempt, &error);
            tracing::warn!(
                model = %request.model,
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "completion request failed, retrying"
            );
            thread::sleep(delay);
            attempt += 1;
        }
    }
}

/// Pseudo-random value in `[0, cap)` taken from the clock's sub-second nanos.
fn jitter_ms(cap: u64) -> u64 {
    if cap == 0 {
        return 0;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::from(elapsed.subsec_nanos()))
        .unwrap_or(0);
    nanos % cap
}
