//! Time types and day count conventions.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Year fraction calculations for expiry handling
//!
//! # Examples
//!
//! ```
//! use simgen_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! let end = Date::from_ymd(2025, 7, 1).unwrap();
//!
//! let yf = DayCountConvention::Actual365Fixed.year_fraction(start, end);
//! assert!((yf - 0.4959).abs() < 0.001);
//! ```

use chrono::{Datelike, Local, NaiveDate, Weekday};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 parsing and the small amount of date arithmetic the
/// simulation harness needs. All expiry dates in a run are derived from a
/// single valuation `Date` anchored once per worker process.
///
/// # Examples
///
/// ```
/// use simgen_core::types::time::Date;
///
/// let date = Date::from_ymd(2025, 6, 16).unwrap();
/// assert_eq!(date.year(), 2025);
///
/// let parsed: Date = "2025-06-16".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 11).unwrap();
/// assert_eq!(end - start, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use simgen_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2024, 2, 29).unwrap();
    /// assert!(Date::from_ymd(2025, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns today's date based on local system time.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    /// Parses a date from ISO 8601 format (YYYY-MM-DD).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day-of-month component.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the weekday.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns the date shifted by `days` calendar days (negative shifts back).
    ///
    /// # Examples
    ///
    /// ```
    /// use simgen_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2025, 12, 30).unwrap();
    /// assert_eq!(date.add_days(2), Date::from_ymd(2026, 1, 1).unwrap());
    /// ```
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }
}

impl Sub for Date {
    type Output = i64;

    /// Number of calendar days between two dates (`self - other`).
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day count convention for converting date pairs into year fractions.
///
/// The harness anchors every expiry against the valuation date, so the
/// convention only needs to turn a (valuation, expiry) pair into a time to
/// maturity in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum DayCountConvention {
    /// Actual/365 Fixed - actual days divided by 365
    #[default]
    Actual365Fixed,
    /// Actual/360 - actual days divided by 360
    Actual360,
}

impl DayCountConvention {
    /// Calculates the year fraction between two dates.
    ///
    /// # Examples
    ///
    /// ```
    /// use simgen_core::types::time::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2025, 1, 1).unwrap();
    /// let end = Date::from_ymd(2026, 1, 1).unwrap();
    /// assert_eq!(DayCountConvention::Actual365Fixed.year_fraction(start, end), 1.0);
    /// ```
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        let days = (end - start) as f64;
        match self {
            DayCountConvention::Actual365Fixed => days / 365.0,
            DayCountConvention::Actual360 => days / 360.0,
        }
    }

    /// Returns the convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::Actual360 => "ACT/360",
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
