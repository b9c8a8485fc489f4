//! Millisecond time source for the coordinator.
//!
//! All timestamps in this crate are milliseconds relative to the process time
//! origin (first observation of [`SystemClock`]). The coordinator never reads
//! wall-clock time directly; it goes through a [`Clock`] handle so tests can
//! substitute [`ManualClock`] and drive timeouts deterministically.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

/// A monotonic millisecond time source.
pub trait Clock {
    /// Returns the current time in milliseconds since the time origin.
    fn now_ms(&self) -> u64;
}

static TIME_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Returns the process time origin, fixed on first call.
fn time_origin() -> Instant {
    *TIME_ORIGIN.get_or_init(Instant::now)
}

/// Clock backed by [`Instant`], relative to the process time origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(time_origin().elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Manually advanced clock for tests and deterministic hosts.
///
/// Clones share the same underlying time; the coordinator holds one clone and
/// the test driver another. `Rc<Cell<_>>` is sufficient because the
/// coordinator is single-threaded cooperative.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a manual clock starting at `now_ms`.
    #[must_use]
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    /// Advances the current time by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_and_shares_time_across_clones() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now_ms(), 150);
        other.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
