//! Time sources.
//!
//! The timestamp command and note bookkeeping read "now" through a
//! [`Clock`]. Tests use [`FixedClock`].

use chrono::{DateTime, Local, TimeZone, Utc};

/// Default format for the timestamp command.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant formatted in local time.
    fn local_timestamp(&self, format: &str) -> String {
        self.now().with_timezone(&Local).format(format).to_string()
    }
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    /// Freezes time at `at`.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    /// Freezes time at a UTC calendar date-time.
    ///
    /// Returns `None` for impossible dates.
    pub fn at_utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    // Formatted in UTC so output doesn't depend on the machine's zone.
    fn local_timestamp(&self, format: &str) -> String {
        self.at.format(format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_format() {
        let clock = FixedClock::at_utc(2026, 10, 18, 9, 5, 0).unwrap();
        assert_eq!(clock.local_timestamp(DEFAULT_TIMESTAMP_FORMAT), "2026/10/18 09:05:00");
        assert_eq!(clock.local_timestamp("%Y-%m-%d"), "2026-10-18");
    }

    #[test]
    fn test_impossible_date() {
        assert!(FixedClock::at_utc(2026, 2, 30, 0, 0, 0).is_none());
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
