//! Calendar walk producing candidate dates.

use crate::domain::weekday::WeekdaySet;
use chrono::{Datelike, NaiveDate};

/// Ascending iterator over every date in `[from, to]` whose weekday is selected.
#[derive(Debug, Clone)]
pub struct CandidateDates {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    weekdays: WeekdaySet,
}

impl CandidateDates {
    pub fn new(from: NaiveDate, to: NaiveDate, weekdays: WeekdaySet) -> Self {
        Self {
            cursor: (from <= to).then_some(from),
            end: to,
            weekdays,
        }
    }
}

impl Iterator for CandidateDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while let Some(day) = self.cursor {
            self.cursor = day.succ_opt().filter(|next| *next <= self.end);
            if self.weekdays.contains(day.weekday()) {
                return Some(day);
            }
        }
        None
    }
}

pub fn candidate_dates(from: NaiveDate, to: NaiveDate, weekdays: WeekdaySet) -> CandidateDates {
    CandidateDates::new(from, to, weekdays)
}
