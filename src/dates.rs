use crate::error::{ReportError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date. `context` names the file/column for the error.
pub fn parse_date(value: &str, context: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ReportError::InvalidDate {
        value: value.to_string(),
        context: context.to_string(),
    })
}

/// Like [`parse_date`], but empty cells and `"NA"` are a soft gap.
pub fn parse_optional_date(value: &str, context: &str) -> Result<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == crate::record::NA {
        return Ok(None);
    }
    parse_date(trimmed, context).map(Some)
}

/// Epidemiological (MMWR) week: weeks start on Sunday and week 1 is the
/// first week holding at least four days of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Epiweek {
    pub year: i32,
    pub week: u32,
}

impl Epiweek {
    pub fn from_date(date: NaiveDate) -> Self {
        let mut year = date.year();
        let mut start = epiyear_start(year);
        if date < start {
            year -= 1;
            start = epiyear_start(year);
        } else {
            let next = epiyear_start(year + 1);
            if date >= next {
                year += 1;
                start = next;
            }
        }
        let week = ((date - start).num_days() / 7) as u32 + 1;
        Self { year, week }
    }
}

impl fmt::Display for Epiweek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

fn epiyear_start(year: i32) -> NaiveDate {
    // Both constructions are valid for every year chrono can represent.
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let from_sunday = jan1.weekday().num_days_from_sunday() as i64;
    if from_sunday <= 3 {
        jan1 - Duration::days(from_sunday)
    } else {
        jan1 + Duration::days(7 - from_sunday)
    }
}

/// Render an optional date the way report tables expect it.
pub fn display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format(DATE_FORMAT).to_string(),
        None => crate::record::NA.to_string(),
    }
}
