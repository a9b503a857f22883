/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use std::time::Duration;

/// How long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Delay after the first failure
    pub initial: Duration,

    /// Upper bound on any single delay
    pub max: Duration,

    /// Pick the actual delay uniformly between zero and the computed delay
    pub jitter: bool,
}

impl Backoff {
    /// Exponential delay before the next attempt, after `failures` failed attempts.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let exp = failures.saturating_sub(1).min(31);
        let delay = self
            .initial
            .checked_mul(1u32 << exp)
            .unwrap_or(self.max)
            .min(self.max);
        if self.jitter {
            delay.mul_f64(rand::random::<f64>())
        } else {
            delay
        }
    }
}

/// Bounded retry around a single fallible attempt.
///
/// Attempts stop at the first success, the first error the predicate rejects,
/// or after `max_attempts`. The last real error is returned, never a wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Retries without sleeping between attempts
    pub fn no_delay(max_attempts: u32) -> Self {
        Self::new(
            max_attempts,
            Backoff {
                initial: Duration::ZERO,
                max: Duration::ZERO,
                jitter: false,
            },
        )
    }

    /// Runs `op` until it succeeds or the policy gives up.
    pub async fn run<T, F, Fut, P>(&self, is_retryable: P, mut op: F) -> Result<T, FlickrError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FlickrError>>,
        P: Fn(&FlickrError) -> bool,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(v) => return Ok(v),
                Err(err) if attempt < self.max_attempts && is_retryable(&err) => {
                    let delay = self.backoff.delay_for(attempt);
                    log::warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        err,
                        delay
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            5,
            Backoff {
                initial: Duration::from_secs(1),
                max: Duration::from_secs(60),
                jitter: true,
            },
        )
    }
}
