//! Time source for naming a run's output files

use chrono::{Local, NaiveDateTime};
use std::fmt;

/// Format of the run stamp embedded in output file names
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Minute-granularity identity of a run, e.g. `20240131_0945`
///
/// Two runs within the same minute share a stamp and overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp(String);

impl RunStamp {
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self(clock.now().format(STAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stamp_from_fixed_clock() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        let stamp = RunStamp::from_clock(&FixedClock(at));
        assert_eq!(stamp.as_str(), "20240131_0905");
        assert_eq!(stamp.to_string(), "20240131_0905");
    }

    #[test]
    fn test_same_minute_collides() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let a = RunStamp::from_clock(&FixedClock(day.and_hms_opt(12, 30, 1).unwrap()));
        let b = RunStamp::from_clock(&FixedClock(day.and_hms_opt(12, 30, 58).unwrap()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_clock_stamp_shape() {
        let stamp = RunStamp::from_clock(&SystemClock);
        let s = stamp.as_str();
        assert_eq!(s.len(), 13);
        assert_eq!(&s[8..9], "_");
        assert!(s.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }
}
