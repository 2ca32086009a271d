//! Business-day enumeration over holiday calendars
//!
//! A `BusinessCalendar` tracks holidays and the start and end of the week,
//! with the days cyclically between end-of-week and start-of-week being
//! weekends. A calendar may also declare no weekend at all (seven-day
//! trading) and encode any rest days as holidays, which supports markets
//! whose weekend has shifted over time.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::common::errors::{IndexError, Result};

/// The calendar period containing a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl FromStr for Period {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(IndexError::UnknownPeriod(other.to_string())),
        }
    }
}

/// A holiday calendar with a configurable weekend
///
/// Weekdays are numbered 0 (Monday) through 6 (Sunday). The weekend is the
/// cyclic range of weekdays strictly between `end_of_week` and
/// `start_of_week`, exclusive of both; `start_of_week = 0`,
/// `end_of_week = 4` gives the conventional Saturday/Sunday weekend, and
/// `end_of_week = 6` gives an empty weekend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    pub holidays: BTreeSet<NaiveDate>,
    pub start_of_week: u8,
    pub end_of_week: u8,
}

impl BusinessCalendar {
    pub fn new(holidays: BTreeSet<NaiveDate>, start_of_week: u8, end_of_week: u8) -> Self {
        Self {
            holidays,
            start_of_week,
            end_of_week,
        }
    }

    /// A Monday-to-Friday calendar with the given holidays
    pub fn weekdays(holidays: BTreeSet<NaiveDate>) -> Self {
        Self::new(holidays, 0, 4)
    }

    /// Whether the weekday (0=Monday..6=Sunday) falls in the weekend range
    pub fn is_weekend(&self, weekday: u8) -> bool {
        let span = (self.start_of_week as i32 - self.end_of_week as i32).rem_euclid(7);
        let rel = (weekday as i32 - self.end_of_week as i32).rem_euclid(7);
        rel > 0 && rel < span
    }

    /// Whether the date is a business day under this calendar
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.is_weekend(weekday_of(date))
    }
}

/// The weekday of a date, numbered 0 (Monday) through 6 (Sunday)
fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// The number of calendar days in a month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// The calendar span containing `dt` for a period: first day and length.
/// Weeks align backwards to the calendar's start-of-week; months, quarters
/// and years use calendar boundaries with real days-in-month arithmetic.
fn period_span(period: Period, calendar: &BusinessCalendar, dt: NaiveDate) -> (NaiveDate, u32) {
    match period {
        Period::Week => {
            let offset =
                (weekday_of(dt) as i32 - calendar.start_of_week as i32).rem_euclid(7) as u64;
            let start = dt
                .checked_sub_days(Days::new(offset))
                .expect("week start within date range");
            (start, 7)
        }
        Period::Month => {
            let start = dt.with_day(1).expect("day 1 is always valid");
            (start, days_in_month(dt.year(), dt.month()))
        }
        Period::Quarter => {
            let quarter_month = (dt.month() - 1) / 3 * 3 + 1;
            let start = NaiveDate::from_ymd_opt(dt.year(), quarter_month, 1)
                .expect("quarter start is always valid");
            let count = (0..3).map(|i| days_in_month(dt.year(), quarter_month + i)).sum();
            (start, count)
        }
        Period::Year => {
            let start =
                NaiveDate::from_ymd_opt(dt.year(), 1, 1).expect("january 1 is always valid");
            let count = if is_leap_year(dt.year()) { 366 } else { 365 };
            (start, count)
        }
    }
}

/// Identifies the business days for the given period, using the given
/// calendar. The period is the week/month/quarter/year containing `dt`.
/// The result is day-ordered and duplicate-free.
pub fn business_days(period: Period, calendar: &BusinessCalendar, dt: NaiveDate) -> Vec<NaiveDate> {
    let (start, count) = period_span(period, calendar, dt);
    (0..count as u64)
        .filter_map(|d| start.checked_add_days(Days::new(d)))
        .filter(|day| calendar.is_business_day(*day))
        .collect()
}

/// The 1-based ordinal of `date` within an enumerated sequence of business
/// days, or `None` when the date is not a business day of the sequence.
/// This is the day index fed to the roll window resolver.
pub fn day_ordinal(days: &[NaiveDate], date: NaiveDate) -> Option<usize> {
    days.iter().position(|d| *d == date).map(|i| i + 1)
}

/// Caches the most recently enumerated span so that repeated lookups for
/// dates inside it skip re-enumeration. Re-derivation is idempotent, so the
/// cache is an optimization only. One cache serves one calendar; use a
/// fresh cache per symbol.
#[derive(Debug, Default)]
pub struct BusinessDayCache {
    period: Option<Period>,
    days: Vec<NaiveDate>,
    span: Option<(NaiveDate, NaiveDate)>,
}

impl BusinessDayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The business days of the period containing `dt`, reusing the cached
    /// span when `dt` falls inside it
    pub fn days_for(
        &mut self,
        period: Period,
        calendar: &BusinessCalendar,
        dt: NaiveDate,
    ) -> &[NaiveDate] {
        let hit = self.period == Some(period)
            && self
                .span
                .map(|(first, last)| first <= dt && dt <= last)
                .unwrap_or(false);
        if !hit {
            self.days = business_days(period, calendar, dt);
            self.period = Some(period);
            // Span bounds come from the full calendar period, not just the
            // surviving business days, so weekend dates still hit the cache.
            let (start, count) = period_span(period, calendar, dt);
            let last = start
                .checked_add_days(Days::new(count as u64 - 1))
                .expect("span end within date range");
            self.span = Some((start, last));
        }
        &self.days
    }
}
