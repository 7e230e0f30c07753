//! Reconnect delay schedule.

use std::time::Duration;

/// Exponential backoff schedule for reconnect attempts.
///
/// The delay doubles (by `factor`) on every advance up to a ceiling and
/// snaps back to the initial value once a connection succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    /// Delay returned right after a reset.
    initial: Duration,

    /// Multiplier applied to the delay on every advance.
    factor: u32,

    /// Delay ceiling.
    max: Duration,

    /// Next delay to hand out.
    next: Duration,
}

impl Backoff {
    /// Create a schedule starting at `initial`.
    pub fn new(initial: Duration, factor: u32, max: Duration) -> Self {
        Self {
            initial,
            factor,
            max,
            next: initial,
        }
    }

    /// Obtain the current delay and precompute the next one.
    pub fn advance(&mut self) -> Duration {
        let current = self.next;
        self.next = current.saturating_mul(self.factor).min(self.max);
        current
    }

    /// Snap back to the initial delay.
    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 2, Duration::from_secs(30))
    }
}
