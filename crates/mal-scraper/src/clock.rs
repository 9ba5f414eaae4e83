//! Time source used for cache freshness and backoff sleeps.

use std::time::{Duration, SystemTime};

/// Wall clock plus a blocking sleep.
///
/// Swapped out in tests to simulate cache expiry and to record backoff
/// delays without waiting.
pub trait Clock {
    fn now(&self) -> SystemTime;
    fn sleep(&self, duration: Duration);
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
