//! Retry decorator with exponential backoff.
//!
//! Wraps any `LlmProvider` and retries transient failures (rate limit,
//! timeout, unavailable service, server-side API error). The delay starts at
//! `initial_delay`, doubles after every failed attempt and is capped at
//! `max_delay`. Non-transient errors are returned immediately.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::LlmProvider;
use crate::config::RetryConfig;
use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// Backoff schedule for one logical request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: config.initial_delay(),
            max_delay: config.max_delay(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

pub struct RetryProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: LlmProvider> RetryProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: LlmProvider> LlmProvider for RetryProvider<P> {
    async fn chat_completion(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let mut attempt = 1;
        loop {
            match self.inner.chat_completion(request).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("Request succeeded after {} attempts", attempt);
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if !error.is_transient() {
                        debug!("Non-retryable error: {}", error);
                        return Err(error);
                    }
                    if attempt >= self.policy.max_attempts {
                        warn!(
                            "Max attempts ({}) exceeded. Last error: {}",
                            self.policy.max_attempts, error
                        );
                        return Err(error);
                    }

                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "Attempt {} failed: {}. Retrying in {:?}...",
                        attempt, error, delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
