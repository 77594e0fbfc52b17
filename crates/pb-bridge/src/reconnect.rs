//! Exponential backoff for reconnection attempts

use std::time::Duration;

use pb_core::config::BackoffConfig;

/// Exponential backoff with jitter
///
/// Jitter spreads out reconnection attempts so a restarted editor is not
/// hit by every waiting client in the same instant.
pub struct ExponentialBackoff {
    initial: Duration,
    current: Duration,
    max: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a backoff from configuration
    pub fn from_config(config: &BackoffConfig) -> Self {
        Self::new(config.initial, config.max, config.multiplier, config.jitter)
    }

    /// Create a backoff with explicit parameters
    pub fn new(initial: Duration, max: Duration, multiplier: f64, jitter: f64) -> Self {
        // The values come from a hand-editable file; clamp anything that
        // would panic in the Duration math (f64 max/min also swallow NaN).
        let multiplier = multiplier.max(1.0);
        let jitter = jitter.max(0.0).min(1.0);
        let max = max.max(initial);

        Self {
            initial,
            current: initial,
            max,
            multiplier,
            jitter,
        }
    }

    /// Get the next delay and advance the backoff
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;

        let next = Duration::try_from_secs_f64(self.current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max);
        self.current = next.min(self.max);

        let jitter_secs = delay.as_secs_f64() * self.jitter * rand::random::<f64>();
        let jitter = Duration::try_from_secs_f64(jitter_secs).unwrap_or_default();
        delay.saturating_add(jitter)
    }

    /// Reset to the initial delay after a successful connection
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}
