//! Month selectors and the date ranges they cover

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::validate_year;

/// Which transactions a month-scoped query covers
///
/// `0` selects every transaction regardless of year; `1..=12` selects one
/// calendar month of a year supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSelector {
    All,
    Month(u32),
}

impl MonthSelector {
    /// Interpret a numeric selector, rejecting anything outside 0..=12
    pub fn from_number(month: i64) -> Result<Self> {
        match month {
            0 => Ok(Self::All),
            1..=12 => Ok(Self::Month(month as u32)),
            _ => Err(Error::InvalidData(format!(
                "Invalid month parameter: {} (use 0 for all, or 1-12)",
                month
            ))),
        }
    }

    /// Parse an optional query value; absent or empty means all time
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(Self::All),
            Some(v) => {
                let month: i64 = v.parse().map_err(|_| {
                    Error::InvalidData(format!("Invalid month parameter: {}", v))
                })?;
                Self::from_number(month)
            }
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Month(m) => Some(*m),
        }
    }

    /// Inclusive date range for this selector in `year`, or `None` when unfiltered
    pub fn date_range(&self, year: i32) -> Result<Option<(NaiveDate, NaiveDate)>> {
        match self {
            Self::All => Ok(None),
            Self::Month(month) => month_bounds(*month, year).map(Some),
        }
    }
}

/// First and last day of a calendar month
pub fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate)> {
    validate_year(year)?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::InvalidData(format!("Invalid month: {}-{:02}", year, month))
    })?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_first
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}-{:02}", year, month)))?;

    Ok((first, last))
}
