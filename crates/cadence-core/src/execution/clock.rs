//! Wall-clock sources for the execution controller.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use jiff::{civil::Date, tz::TimeZone, SignedDuration, Timestamp, Zoned};

/// Source of the current time.
pub trait Clock: fmt::Debug {
    fn now(&self) -> Timestamp;

    /// The current instant in the system time zone.
    fn zoned_now(&self) -> Zoned {
        self.now().to_zoned(TimeZone::system())
    }

    /// Today's date in the system time zone.
    fn today(&self) -> Date {
        self.zoned_now().date()
    }
}

/// A clock shared between a tracker and the controllers it hands out.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward (or backward, for negative values) by whole
    /// seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now = now.checked_add(SignedDuration::from_secs(secs)).unwrap_or(*now);
    }

    pub fn set(&self, at: Timestamp) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
