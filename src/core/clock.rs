use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of wall-clock instants for the scheduler.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same instant, so a
/// test can keep one handle while the scheduler owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(TimeDelta::milliseconds(ms));
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Milliseconds from `start` to `end` with microsecond resolution.
pub fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start)
        .num_microseconds()
        .map_or(f64::MAX, |us| us as f64 / 1000.0)
}

/// Delay of `ms` milliseconds, rounded to the nearest microsecond.
pub fn delay_from_ms(ms: f64) -> TimeDelta {
    TimeDelta::microseconds((ms.max(0.0) * 1000.0).round() as i64)
}
