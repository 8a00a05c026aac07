// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host timestamps.
//!
//! [`HostTime`] is a point on the host's monotonic clock in nanoseconds. The
//! engine never reads a clock itself. The host passes the current time into
//! [`Composer::render_pass`](crate::composer::Composer::render_pass), and the
//! value is only used to stamp [trace](crate::trace) events.

use core::fmt;
use core::ops::Add;
use core::time::Duration;

/// A point in time on the host's monotonic clock, in nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from nanoseconds.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns the timestamp in nanoseconds.
    #[inline]
    #[must_use]
    pub const fn nanos(self) -> u64 {
        self.0
    }

    /// Returns the time elapsed since `earlier`, or zero if `earlier` is
    /// after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[must_use]
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        let nanos = u64::try_from(duration.as_nanos()).ok()?;
        self.0.checked_add(nanos).map(Self)
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on overflow.
    fn add(self, rhs: Duration) -> Self {
        match self.checked_add(rhs) {
            Some(t) => t,
            None => panic!("host time overflow"),
        }
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}ns)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_saturates() {
        let a = HostTime::from_nanos(1_000);
        let b = a + Duration::from_micros(2);
        assert_eq!(b.nanos(), 3_000);
        assert_eq!(b.saturating_duration_since(a), Duration::from_nanos(2_000));
        assert_eq!(a.saturating_duration_since(b), Duration::ZERO);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(HostTime(u64::MAX).checked_add(Duration::from_nanos(1)), None);
        assert_eq!(
            HostTime::ZERO.checked_add(Duration::from_nanos(5)),
            Some(HostTime(5))
        );
    }

    #[test]
    fn debug_shows_unit() {
        assert_eq!(format!("{:?}", HostTime(42)), "HostTime(42ns)");
    }
}
