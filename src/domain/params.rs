//! Validated run parameters.
//!
//! Raw caller input goes through a fixed pipeline of named checks. The first
//! failing check wins, and nothing touches the network until all have passed.

use crate::domain::credential::{AuthScheme, Credential};
use crate::domain::error::ValidationError;
use crate::domain::weekday::WeekdaySet;
use chrono::NaiveDate;

/// Longest accepted span between the first and last day, in days.
pub const MAX_RANGE_DAYS: i64 = 100;

/// Unvalidated input as collected by a front-end.
#[derive(Debug, Clone)]
pub struct RawParams {
    pub credential: String,
    pub auth: AuthScheme,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub weekdays: WeekdaySet,
    pub owner_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    credential: Credential,
    date_from: NaiveDate,
    date_to: NaiveDate,
    weekdays: WeekdaySet,
    owner_id: Option<u64>,
}

impl Params {
    pub fn validate(raw: RawParams) -> Result<Self, ValidationError> {
        let credential = check_credential(&raw)?;
        check_dates(raw.date_from, raw.date_to)?;
        check_weekdays(&raw.weekdays)?;
        Ok(Self {
            credential,
            date_from: raw.date_from,
            date_to: raw.date_to,
            weekdays: raw.weekdays,
            owner_id: raw.owner_id,
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn date_from(&self) -> NaiveDate {
        self.date_from
    }

    pub fn date_to(&self) -> NaiveDate {
        self.date_to
    }

    pub fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    /// Owner id supplied by the caller, if any. When absent it is looked up
    /// through the session.
    pub fn owner_id(&self) -> Option<u64> {
        self.owner_id
    }
}

fn check_credential(raw: &RawParams) -> Result<Credential, ValidationError> {
    Credential::parse(&raw.credential, raw.auth)
}

/// Checks `from <= to` and a span of at most [`MAX_RANGE_DAYS`].
pub fn check_dates(from: NaiveDate, to: NaiveDate) -> Result<(), ValidationError> {
    if from > to {
        return Err(ValidationError::InvalidRange {
            from,
            to,
            reason: "start date is after end date".to_string(),
        });
    }
    let span = (to - from).num_days();
    if span > MAX_RANGE_DAYS {
        return Err(ValidationError::InvalidRange {
            from,
            to,
            reason: format!("{span} days apart, at most {MAX_RANGE_DAYS} allowed"),
        });
    }
    Ok(())
}

pub fn check_weekdays(weekdays: &WeekdaySet) -> Result<(), ValidationError> {
    if weekdays.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    Ok(())
}
