//! Clock abstraction so session timing is deterministic in tests.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A source of monotonic instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// It can also be moved backwards, which a real monotonic clock never does;
/// that lets tests exercise the session's clamping of negative durations.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Start an hour ahead of the real clock so `rewind` has room to move.
    pub fn new() -> Self {
        Self::starting_at(Instant::now() + Duration::from_secs(3600))
    }

    pub fn starting_at(at: Instant) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut current = self.lock();
        *current += delta;
    }

    /// Move the clock backwards. Saturates at the earliest representable instant.
    pub fn rewind(&self, delta: Duration) {
        let mut current = self.lock();
        if let Some(earlier) = current.checked_sub(delta) {
            *current = earlier;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Instant> {
        // A poisoned lock still holds a valid instant.
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - start, Duration::from_millis(1500));

        clock.rewind(Duration::from_secs(2));
        assert!(clock.now() < start);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
