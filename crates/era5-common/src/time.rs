//! Calendar-month handling for monthly aggregated datasets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, TimeParseError> {
        if !(1..=12).contains(&month) {
            return Err(TimeParseError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| TimeParseError::InvalidFormat(format!("{}-{:02}", year, month)))?;
        Ok(Self { year, month })
    }

    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        let next = self
            .first_day()
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            year: next.year(),
            month: next.month(),
        }
    }

    /// Half-open date range `[first day, first day of next month)`.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.succ().first_day())
    }

    /// Human label, e.g. "January 2020".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Every month from `start` to `end`, both inclusive.
    pub fn range_inclusive(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            months.push(cursor);
            let next = cursor.succ();
            if next == cursor {
                break;
            }
            cursor = next;
        }
        months
    }

    /// Months covered by a dataset whose time extent is `[min, max]`.
    pub fn from_extent(min: &DateTime<Utc>, max: &DateTime<Utc>) -> Vec<YearMonth> {
        Self::range_inclusive(Self::from_datetime(min), Self::from_datetime(max))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = TimeParseError;

    /// Parse "YYYY-MM" (a trailing "-DD" is accepted and ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '-');
        let year = parts
            .next()
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;
        let month = parts
            .next()
            .and_then(|m| m.parse::<u32>().ok())
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;
        YearMonth::new(year, month)
    }
}

/// Distinct years present in `months`, newest first.
pub fn years_descending(months: &[YearMonth]) -> Vec<i32> {
    let mut years: Vec<i32> = months.iter().map(|m| m.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Month numbers available in `year`, ascending.
pub fn months_in_year(months: &[YearMonth], year: i32) -> Vec<u32> {
    let mut result: Vec<u32> = months
        .iter()
        .filter(|m| m.year == year)
        .map(|m| m.month)
        .collect();
    result.sort_unstable();
    result.dedup();
    result
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid month format: {0}. Expected 'YYYY-MM'")]
    InvalidFormat(String),

    #[error("Month out of range: {0}")]
    InvalidMonth(u32),
}
