//! Existing leave records and their date tokens.

use crate::domain::error::HomeOfficeError;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Raw result of a leave query, before name parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveListing {
    pub names: Vec<String>,
    /// Display name of the authenticated user, when the platform reports one.
    pub principal: Option<String>,
}

/// Days already recorded as leave for the owner within the queried range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingLeaves {
    pub dates: BTreeSet<NaiveDate>,
    pub owner_name: Option<String>,
}

impl ExistingLeaves {
    pub fn from_listing(listing: LeaveListing) -> Result<Self, HomeOfficeError> {
        let dates = listing
            .names
            .iter()
            .map(String::as_str)
            .map(parse_leave_name)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            dates,
            owner_name: listing.principal,
        })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.dates.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for ExistingLeaves {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
            owner_name: None,
        }
    }
}

/// Extracts the date from a record name of the form `<prefix>-YYYYMMDD-<suffix>`.
///
/// The token is the second `-`-delimited segment and must be exactly eight
/// ASCII digits forming a real calendar date.
pub fn parse_leave_name(name: &str) -> Result<NaiveDate, HomeOfficeError> {
    let unparseable = || HomeOfficeError::UnparseableRecord {
        name: name.to_string(),
    };
    let token = name.split('-').nth(1).ok_or_else(unparseable)?;
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unparseable());
    }
    NaiveDate::parse_from_str(token, "%Y%m%d").map_err(|_| unparseable())
}
