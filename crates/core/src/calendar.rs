//! Approximate calendar dates and the clock that produces "today".
//!
//! Date arithmetic here is intentionally NOT Gregorian: every month has 30 days
//! and every year 12 months. Due dates and overdue checks are defined against
//! this rule, so it must not be swapped for a real calendar library.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Days per month in the approximate calendar.
pub const DAYS_PER_MONTH: u32 = 30;

/// Months per year in the approximate calendar.
pub const MONTHS_PER_YEAR: u32 = 12;

/// A (day, month, year) triple.
///
/// Field order matters: the derived ordering is lexicographic on
/// (year, month, day).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl ValueObject for CalendarDate {}

impl CalendarDate {
    /// No range validation is performed.
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { year, month, day }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Advance by `days` using the 30-day-month / 12-month-year normalization.
    ///
    /// Overflowing days carry `day / 30` months and keep `day % 30` (a zero
    /// remainder becomes 30); overflowing months carry into the year the same way.
    /// E.g. 25/3 + 10 days = 5/4, and 30/1 + 30 days = 30/3.
    ///
    /// Fails with `Validation` when the result does not fit the date fields.
    pub fn add_days(&self, days: u32) -> DomainResult<Self> {
        let out_of_range =
            || DomainError::validation(format!("{self} + {days} days is out of calendar range"));

        let mut next = *self;
        next.day = next.day.checked_add(days).ok_or_else(out_of_range)?;
        if next.day > DAYS_PER_MONTH {
            next.month = next
                .month
                .checked_add(next.day / DAYS_PER_MONTH)
                .ok_or_else(out_of_range)?;
            next.day %= DAYS_PER_MONTH;
            if next.day == 0 {
                next.day = DAYS_PER_MONTH;
            }
        }
        if next.month > MONTHS_PER_YEAR {
            let years = i32::try_from(next.month / MONTHS_PER_YEAR).map_err(|_| out_of_range())?;
            next.year = next.year.checked_add(years).ok_or_else(out_of_range)?;
            next.month %= MONTHS_PER_YEAR;
            if next.month == 0 {
                next.month = MONTHS_PER_YEAR;
            }
        }
        Ok(next)
    }

    /// `true` iff `current` is strictly after this date.
    pub fn is_overdue(&self, current: &CalendarDate) -> bool {
        self < current
    }
}

impl core::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        Self::new(value.day(), value.month(), value.year())
    }
}

/// Source of "today" for lending operations.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        chrono::Local::now().date_naive().into()
    }
}

/// Manually driven clock for tests and scripted runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock {
    today: CalendarDate,
}

impl FixedClock {
    pub fn new(today: CalendarDate) -> Self {
        Self { today }
    }

    pub fn set(&mut self, today: CalendarDate) {
        self.today = today;
    }

    /// Move forward using the same approximate arithmetic as due dates.
    pub fn advance(&mut self, days: u32) -> DomainResult<()> {
        self.today = self.today.add_days(days)?;
        Ok(())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.today
    }
}
