//! Client configuration with usable defaults.
//!
//! All duration fields are plain milliseconds so a config can live in a
//! TOML file without custom deserializers.

use std::time::Duration;

use serde::Deserialize;

use crate::rpc::Commitment;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// HTTP endpoint of the network's RPC interface.
    pub endpoint: String,
    pub request_timeout_ms: u64,
    pub confirm: ConfirmPolicy,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8899".to_string(),
            request_timeout_ms: 30_000,
            confirm: ConfirmPolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// How long and how often to poll for a transaction's status.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ConfirmPolicy {
    pub poll_interval_ms: u64,
    /// Status polls before the wait gives up with a timeout.
    pub max_attempts: u32,
    /// Durability level that counts as success.
    pub target: Commitment,
}

impl ConfirmPolicy {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        // 30 × 500 ms stays well inside the network's reference
        // validity window.
        Self {
            poll_interval_ms: 500,
            max_attempts: 30,
            target: Commitment::Confirmed,
        }
    }
}

/// Capped exponential backoff for transient failures.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based): doubles each
    /// time, capped at `max_delay_ms`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        let millis = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(millis)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 250,
            max_delay_ms: 4_000,
        }
    }
}
