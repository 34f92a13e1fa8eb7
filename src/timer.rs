//! Dead-man shutdown timer.
//!
//! Tracks the time since the last keep-alive. The service resets it on
//! every power-on trigger and PING; once the configured delay elapses with
//! no reset while the output is on, the service starts a graceful shutdown.
//!
//! Timestamps are caller-supplied monotonic milliseconds so the logic is
//! deterministic under test. Elapsed time uses wrapping subtraction, which
//! stays correct across the u32 rollover (~49.7 days of uptime).

/// Dead-man timeout tracker.
pub struct ShutdownTimer {
    delay_ms: u32,
    baseline_ms: u32,
}

impl ShutdownTimer {
    /// Create a timer with the given delay. The baseline starts at zero;
    /// call [`reset`](Self::reset) before the first loop tick.
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            baseline_ms: 0,
        }
    }

    /// Store `now_ms` as the new baseline.
    pub fn reset(&mut self, now_ms: u32) {
        self.baseline_ms = now_ms;
    }

    /// True once at least `delay_ms` has elapsed since the last reset.
    pub fn is_outdated(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.baseline_ms) >= self.delay_ms
    }

    /// Change the delay without touching the baseline.
    pub fn set_delay(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// The configured delay in milliseconds.
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}
