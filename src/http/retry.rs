//! Retry policy
//!
//! Classifies each attempt's outcome and schedules the wait before the next one.

use crate::error::is_retryable_status;
use crate::types::BackoffType;
use std::time::Duration;

/// What happened on one attempt, as seen by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpOutcome {
    /// A response arrived with a non-2xx status
    Status(u16),
    /// No response within the timeout
    Timeout,
    /// The connection could not be established
    Connect,
    /// Any other transport failure
    Network,
}

/// Classifier verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    /// Worth another attempt
    Retryable,
    /// Fail now
    Terminal,
}

/// Outcome classifier
pub type Classifier = fn(&HttpOutcome) -> RetryClass;

/// Timeouts, connection failures, 429 and 5xx are retryable; the rest is terminal.
pub fn default_classifier(outcome: &HttpOutcome) -> RetryClass {
    match outcome {
        HttpOutcome::Timeout | HttpOutcome::Connect => RetryClass::Retryable,
        HttpOutcome::Status(status) if is_retryable_status(*status) => RetryClass::Retryable,
        _ => RetryClass::Terminal,
    }
}

/// Retry configuration for the request executor
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Delay growth between retries
    pub backoff: BackoffType,
    /// Outcome classifier
    pub classify: Classifier,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
            backoff: BackoffType::Exponential,
            classify: default_classifier,
        }
    }
}

impl RetryPolicy {
    /// Exponential policy with the given attempt budget and base delay
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Default::default()
        }
    }

    /// A single attempt, never retried
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Set the backoff type
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the delay cap
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Replace the classifier
    #[must_use]
    pub fn with_classifier(mut self, classify: Classifier) -> Self {
        self.classify = classify;
        self
    }

    /// Classify an outcome
    pub fn classify(&self, outcome: &HttpOutcome) -> RetryClass {
        (self.classify)(outcome)
    }

    /// Attempt budget, never below one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after failed attempt number `attempt` (1-based).
    ///
    /// Exponential: `base_delay * 2^(attempt-1)`, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let delay = match self.backoff {
            BackoffType::Constant => self.base_delay,
            BackoffType::Linear => self.base_delay.saturating_mul(attempt),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt - 1);
                self.base_delay.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_delay)
    }
}
