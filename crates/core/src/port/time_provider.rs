// Time Provider Port (for testability)

use crate::domain::Timestamp;

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in seconds since epoch
    fn now_secs(&self) -> Timestamp;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_secs(&self) -> Timestamp {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed clock (tests and replays)
pub struct FixedTimeProvider(pub Timestamp);

impl TimeProvider for FixedTimeProvider {
    fn now_secs(&self) -> Timestamp {
        self.0
    }
}
