//! Backoff between re-issued transient provider calls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay strategy between transient retries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`, optionally jittered by +/- 50%.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(500),
            factor: 2.0,
            max: Duration::from_secs(8),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = base.as_secs_f64() * factor.powi(exponent);
                let capped = if seconds.is_finite() {
                    seconds.min(max.as_secs_f64())
                } else {
                    max.as_secs_f64()
                };
                let delay = Duration::from_secs_f64(capped.max(0.0));

                if jitter {
                    jittered(delay)
                } else {
                    delay
                }
            }
        }
    }
}

fn jittered(delay: Duration) -> Duration {
    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    let spread = millis / 2;
    let offset = fastrand::u64(0..=spread.saturating_mul(2));
    Duration::from_millis(millis.saturating_sub(spread).saturating_add(offset))
}

/// How often a transient failure is re-issued before it propagates.
///
/// The default performs no retries: a transient failure propagates on first sight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransientRetry {
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl TransientRetry {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before retry `attempt`, or `None` once retries are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_retries).then(|| self.backoff.delay(attempt))
    }
}
