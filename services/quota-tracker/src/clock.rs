//! Wall-clock source used to derive the current quota period.

use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Device-local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to. Used by tests and harnesses to cross
/// month boundaries deterministically.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            current: Mutex::new(now),
        }
    }

    /// Midnight on the first day of `year`-`month`.
    ///
    /// Panics on an out-of-range month; intended for fixtures.
    pub fn at_month(year: i32, month: u32) -> Self {
        Self::new(month_start(year, month))
    }

    pub fn set(&self, now: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = now;
    }

    pub fn set_month(&self, year: i32, month: u32) {
        self.set(month_start(year, month));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Formats the calendar-month period key (`YYYY-MM`) for `now`.
pub fn period_key(now: &NaiveDateTime) -> String {
    now.format("%Y-%m").to_string()
}

fn month_start(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_else(|| panic!("invalid fixture month {year}-{month}"))
}
