//! Time utilities for bank-local calendar dates.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;

/// Layout of `RateTable::date_loaded` (`YYYY-MM-DD`).
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// A timestamp (always UTC internally).
pub type Timestamp = DateTime<Utc>;

/// Format `now` as a calendar date in the given timezone.
pub fn local_date(now: Timestamp, tz: Tz) -> String {
    now.with_timezone(&tz).format(DATE_LAYOUT).to_string()
}

/// Source of the current time.
///
/// Everything that stamps or checks a bank-local date reads "now" through a
/// clock so the calendar can be moved in tests.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: Timestamp) {
        *self.now.write() = now;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_follows_timezone() {
        // 2023-04-17 20:30 UTC is already the 18th in Bangkok (UTC+7)
        // but still the 17th in Moscow (UTC+3 => 23:30).
        let now = Utc.with_ymd_and_hms(2023, 4, 17, 20, 30, 0).unwrap();

        assert_eq!(local_date(now, chrono_tz::Asia::Bangkok), "2023-04-18");
        assert_eq!(local_date(now, chrono_tz::Europe::Moscow), "2023-04-17");
    }

    #[test]
    fn test_manual_clock() {
        let start = Utc.with_ymd_and_hms(2023, 4, 17, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::hours(25));
        assert_eq!(clock.now(), start + Duration::hours(25));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
