//! Linear backoff for rate-limited requests.
//!
//! The site answers 429 when hit too often. Each retry waits one step
//! longer than the previous one (1s, 2s, 3s, ... with the default step),
//! up to a fixed number of requests.

use std::time::Duration;

/// Default number of requests made for one URL before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Default backoff step
pub const DEFAULT_STEP: Duration = Duration::from_secs(1);

/// Linear backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    /// Maximum number of requests, including the first one
    max_attempts: u32,
    /// Delay added per retry
    step: Duration,
}

impl LinearBackoff {
    /// Create a new policy. At least one request is always made.
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            step,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given (1-based) attempt was rate limited,
    /// or `None` when the budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.step * attempt)
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_STEP)
    }
}
