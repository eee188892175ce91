//! Time source abstraction.
//!
//! Everything in this crate that compares against "now" takes a [`Clock`]
//! so callers can pin the instant in tests.

use chrono::{Duration, Utc};

use crate::types::Timestamp;

/// A source of the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> Timestamp;
}

/// Wall clock. This is the clock used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub instant: Timestamp,
}

impl FixedClock {
    #[must_use]
    pub const fn new(instant: Timestamp) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.instant
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// The instant `window` before `now`.
///
/// `None` when that instant is outside chrono's range, in which case no
/// representable instant is older than the window.
pub fn window_start(now: Timestamp, window: Duration) -> Option<Timestamp> {
    now.checked_sub_signed(window)
}
