use std::thread;
use std::time::{Duration, Instant};

/// Minimum-spacing gate placed in front of every provider call.
///
/// Holds the instant the previous acquisition completed. An acquisition waits
/// out whatever remains of `min_interval` since then, however long the gate
/// sat idle before.
#[derive(Debug, Clone)]
pub struct AccessGate {
    min_interval: Duration,
    last_acquired: Option<Instant>,
}

impl AccessGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_acquired: None,
        }
    }

    /// Gate that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Blocks until `min_interval` has passed since the previous acquisition,
    /// then records the current instant as the new previous acquisition.
    pub fn acquire(&mut self) {
        if let Some(wait) = self.remaining_wait() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "access gate waiting");
            thread::sleep(wait);
        }
        self.last_acquired = Some(Instant::now());
    }

    fn remaining_wait(&self) -> Option<Duration> {
        let elapsed = self.last_acquired?.elapsed();
        self.min_interval
            .checked_sub(elapsed)
            .filter(|wait| !wait.is_zero())
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_acquire_does_not_wait() {
        let mut gate = AccessGate::new(Duration::from_millis(200));

        let started = Instant::now();
        gate.acquire();
        assert!(started.elapsed() < Duration::from_millis(150));
    }

    #[test]
    fn consecutive_acquires_are_spaced() {
        let interval = Duration::from_millis(60);
        let mut gate = AccessGate::new(interval);

        let started = Instant::now();
        gate.acquire();
        gate.acquire();
        gate.acquire();
        assert!(started.elapsed() >= interval * 2);
    }

    #[test]
    fn spacing_holds_after_idle_period() {
        let interval = Duration::from_millis(80);
        let mut gate = AccessGate::new(interval);

        gate.acquire();
        thread::sleep(interval * 3);

        gate.acquire();
        let after_idle = Instant::now();
        gate.acquire();
        assert!(
            after_idle.elapsed() >= interval,
            "gap after idle was {:?}",
            after_idle.elapsed()
        );
    }

    #[test]
    fn partial_idle_only_waits_the_remainder() {
        let interval = Duration::from_millis(120);
        let mut gate = AccessGate::new(interval);

        gate.acquire();
        thread::sleep(Duration::from_millis(60));

        let started = Instant::now();
        gate.acquire();
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(40), "waited {waited:?}");
        assert!(waited < interval, "waited {waited:?}");
    }

    #[test]
    fn disabled_gate_never_blocks() {
        let mut gate = AccessGate::disabled();

        let started = Instant::now();
        for _ in 0..50 {
            gate.acquire();
        }
        assert!(started.elapsed() < Duration::from_millis(50));
        assert_eq!(gate.min_interval(), Duration::ZERO);
    }
}
