//! Retry policy and the sleep seam used between attempts.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// Attempt budget, temperature ramp and backoff for a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_temperature: f32,
    pub temperature_step: f32,
    pub backoff_base_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_temperature: 0.8,
            temperature_step: 0.1,
            backoff_base_secs: 2,
        }
    }
}

impl RetryPolicy {
    /// Wait before the zero-based `attempt`; none before the first.
    pub fn backoff_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return None;
        }
        let secs = self.backoff_base_secs.saturating_pow(attempt);
        Some(Duration::from_secs(secs))
    }

    /// Sampling temperature for the zero-based `attempt`
    pub fn temperature_for(&self, attempt: u32) -> f32 {
        self.base_temperature + attempt as f32 * self.temperature_step
    }
}

/// Something that can wait. Swapped out in tests so backoff is observable
/// without real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested sleeps and returns immediately
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
