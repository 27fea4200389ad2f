//! Session time
//!
//! All engines take `now: SessionTime` as an argument; nothing in the
//! workspace reads the wall clock on its own. The embedding application
//! owns the clock, which keeps recognition, recording, and the workflow
//! scheduler deterministic under test.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Time since session start, in microseconds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionTime(pub i64);

impl SessionTime {
    pub const ZERO: SessionTime = SessionTime(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        SessionTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        SessionTime(millis * 1000)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SessionTime((secs * 1_000_000.0) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        SessionTime(self.0.saturating_add(duration.as_micros() as i64))
    }

    /// Elapsed time since `earlier`; zero if `earlier` is in the future.
    #[inline]
    pub fn since(self, earlier: SessionTime) -> Duration {
        let diff = self.0 - earlier.0;
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl Add<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        SessionTime(self.0 + rhs.as_micros() as i64)
    }
}

impl Sub<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        SessionTime(self.0 - rhs.as_micros() as i64)
    }
}

impl std::fmt::Debug for SessionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}s)", self.as_secs_f64())
    }
}
