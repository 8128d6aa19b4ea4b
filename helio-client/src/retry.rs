//! Bounded retry with capped exponential backoff.
//!
//! The client's own methods never retry implicitly: absence, rejection,
//! and timeouts all mean something to the caller. This helper is for the
//! outer layer (scripts, runners) that decides a transient failure is
//! worth another attempt.

use std::future::Future;

use tokio::time::sleep;
use tracing::debug;

use crate::config::RetryPolicy;
use crate::error::ClientError;

/// Run `op`, retrying transient failures up to the policy's budget.
///
/// Non-transient errors surface immediately. The closure is re-invoked
/// from scratch on every attempt, so callers can rebuild state that may
/// have gone stale (a fresh block reference, typically).
pub async fn with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                debug!(attempt, ?delay, error = %err, "transient failure, backing off");
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
