use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Inclusive span of time used for ledger queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidWindow);
        }
        Ok(Self { start, end })
    }

    /// From the start of `start` through the last second of `end`.
    pub fn between_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(start_of_day(start), end_of_day(end))
    }

    /// A single calendar day, `00:00:00` through `23:59:59`.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }

    /// First through last calendar day of the given month.
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self {
            start: start_of_day(first),
            end: end_of_day(last),
        })
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| start_of_day(date))
}
