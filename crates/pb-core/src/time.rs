//! Time utilities for keepalive timestamps

use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current time as milliseconds since the Unix epoch
///
/// # Panics
///
/// Panics if the system clock is set before the Unix epoch.
///
/// # Examples
///
/// ```
/// use pb_core::time::current_time_millis;
///
/// let now = current_time_millis();
/// assert!(now > 0);
/// ```
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_millis() as u64
}

/// Milliseconds elapsed since an earlier `current_time_millis` reading
///
/// Saturates to zero if the clock moved backwards.
pub fn elapsed_millis(earlier: u64) -> u64 {
    current_time_millis().saturating_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_time_is_reasonable() {
        // After 2020-01-01 in milliseconds
        assert!(current_time_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_elapsed_is_monotonic_enough() {
        let earlier = current_time_millis();
        assert!(elapsed_millis(earlier) < 1_000);
    }

    #[test]
    fn test_elapsed_saturates_on_future_timestamps() {
        let future = current_time_millis() + 10_000;
        assert_eq!(elapsed_millis(future), 0);
    }
}
