//! Time sources for the generator.

use chrono::Utc;
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

/// Provides wall-clock time in milliseconds since the Unix epoch.
///
/// The generator reads the clock once per [`next_id`] call, and repeatedly
/// while waiting for the next millisecond after its sequence is exhausted.
///
/// [`next_id`]: crate::Snowflake::next_id
pub trait Clock: Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to a
/// generator and keep another to freeze, advance or rewind time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    /// Create a clock frozen at `millis`.
    pub fn new(millis: i64) -> Self {
        Self(Arc::new(AtomicI64::new(millis)))
    }

    /// Move the clock to `millis`, backwards or forwards.
    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_utc_now() {
        let before = Utc::now().timestamp_millis();
        let now = SystemClock.now_millis();
        let after = Utc::now().timestamp_millis();

        assert!(now >= before);
        assert!(now <= after);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();

        handle.advance(5);
        assert_eq!(clock.now_millis(), 1_005);

        handle.set(900);
        assert_eq!(clock.now_millis(), 900);
    }
}
