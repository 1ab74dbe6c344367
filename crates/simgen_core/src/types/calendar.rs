//! Business-day calendars and date advancement.
//!
//! The harness anchors a valuation date on a business day and advances it by
//! a whole number of days to obtain contract expiries. Advancement is
//! business-day-aware by default, with a raw calendar-day fallback selectable
//! via [`DateAdvance`].

use chrono::Weekday;
use std::fmt;

use super::time::Date;

/// Holiday calendar used for business-day arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Calendar {
    /// Saturdays and Sundays are the only non-business days.
    WeekendsOnly,
    /// United States settlement calendar (weekends plus federal holidays,
    /// with Saturday holidays observed on Friday and Sunday holidays on
    /// Monday).
    #[default]
    UsSettlement,
}

impl Calendar {
    /// Returns true if the date falls on a Saturday or Sunday.
    pub fn is_weekend(&self, date: Date) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Returns true if the date is a business day under this calendar.
    pub fn is_business_day(&self, date: Date) -> bool {
        if self.is_weekend(date) {
            return false;
        }
        match self {
            Calendar::WeekendsOnly => true,
            Calendar::UsSettlement => !us_settlement_holiday(date),
        }
    }

    /// Rolls the date forward to the next business day (Following).
    ///
    /// Returns the date unchanged when it already is a business day.
    pub fn adjust(&self, mut date: Date) -> Date {
        while !self.is_business_day(date) {
            date = date.add_days(1);
        }
        date
    }

    /// Advances the date by `n` business days.
    ///
    /// Each step moves at least one calendar day and lands on a business day,
    /// so the result of a positive advance is always strictly later than the
    /// start date.
    ///
    /// # Examples
    ///
    /// ```
    /// use simgen_core::types::{Calendar, Date};
    ///
    /// // Friday + 1 business day = Monday
    /// let friday = Date::from_ymd(2025, 6, 13).unwrap();
    /// let monday = Calendar::WeekendsOnly.advance_business_days(friday, 1);
    /// assert_eq!(monday, Date::from_ymd(2025, 6, 16).unwrap());
    /// ```
    pub fn advance_business_days(&self, date: Date, n: u32) -> Date {
        let mut current = date;
        for _ in 0..n {
            current = current.add_days(1);
            while !self.is_business_day(current) {
                current = current.add_days(1);
            }
        }
        current
    }

    /// Returns the calendar name.
    pub fn name(&self) -> &'static str {
        match self {
            Calendar::WeekendsOnly => "weekends-only",
            Calendar::UsSettlement => "us-settlement",
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a day offset is applied to the valuation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum DateAdvance {
    /// Advance by business days under the session calendar.
    #[default]
    BusinessDays,
    /// Add raw calendar days, ignoring the calendar.
    CalendarDays,
}

impl DateAdvance {
    /// Applies the offset `days` to `date` under `calendar`.
    pub fn apply(&self, calendar: Calendar, date: Date, days: u32) -> Date {
        match self {
            DateAdvance::BusinessDays => calendar.advance_business_days(date, days),
            DateAdvance::CalendarDays => date.add_days(i64::from(days)),
        }
    }
}

/// US settlement holiday rules.
///
/// Fixed-date holidays observe Saturday occurrences on the preceding Friday
/// and Sunday occurrences on the following Monday.
fn us_settlement_holiday(date: Date) -> bool {
    let (m, d, wd) = (date.month(), date.day(), date.weekday());

    // Fixed-date holidays with weekend observation.
    if observed_fixed(date, 1, 1) {
        return true; // New Year's Day
    }
    if date.year() >= 2022 && observed_fixed(date, 6, 19) {
        return true; // Juneteenth
    }
    if observed_fixed(date, 7, 4) {
        return true; // Independence Day
    }
    if observed_fixed(date, 11, 11) {
        return true; // Veterans Day
    }
    if observed_fixed(date, 12, 25) {
        return true; // Christmas Day
    }

    // Floating holidays.
    match (m, wd) {
        (1, Weekday::Mon) if (15..=21).contains(&d) => true, // Martin Luther King
        (2, Weekday::Mon) if (15..=21).contains(&d) => true, // Washington's Birthday
        (5, Weekday::Mon) if d >= 25 => true,                // Memorial Day
        (9, Weekday::Mon) if d <= 7 => true,                 // Labor Day
        (10, Weekday::Mon) if (8..=14).contains(&d) => true, // Columbus Day
        (11, Weekday::Thu) if (22..=28).contains(&d) => true, // Thanksgiving
        _ => false,
    }
}

/// True when `date` is the observed occurrence of the fixed holiday
/// `(month, day)`: the day itself on a weekday, the preceding Friday when it
/// falls on Saturday, or the following Monday when it falls on Sunday.
fn observed_fixed(date: Date, month: u32, day: u32) -> bool {
    let on = |d: Date| d.month() == month && d.day() == day;
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => false,
        Weekday::Fri => on(date) || on(date.add_days(1)),
        Weekday::Mon => on(date) || on(date.add_days(-1)),
        _ => on(date),
    }
}
