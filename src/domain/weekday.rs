//! Working-day selectors (Monday to Friday).

use crate::domain::error::ValidationError;
use chrono::Weekday;
use std::fmt;

/// The selectable working days, in calendar order.
pub const WORKING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// A set of working days, stored as a bitmask indexed from Monday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Adds a working day. Weekend days are not selectable.
    pub fn insert(&mut self, day: Weekday) -> Result<(), ValidationError> {
        if matches!(day, Weekday::Sat | Weekday::Sun) {
            return Err(ValidationError::UnknownWeekday(full_name(day).to_string()));
        }
        self.0 |= 1 << day.num_days_from_monday();
        Ok(())
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> {
        let set = *self;
        WORKING_DAYS.into_iter().filter(move |d| set.contains(*d))
    }

    pub fn from_days<I: IntoIterator<Item = Weekday>>(days: I) -> Result<Self, ValidationError> {
        let mut set = Self::new();
        for day in days {
            set.insert(day)?;
        }
        Ok(set)
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(full_name).collect();
        write!(f, "{}", names.join(", "))
    }
}

pub fn full_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses one working-day name. Accepts full names and three-letter
/// abbreviations, case-insensitively.
pub fn parse_weekday(token: &str) -> Result<Weekday, ValidationError> {
    let lowered = token.trim().to_lowercase();
    WORKING_DAYS
        .into_iter()
        .find(|d| {
            let name = full_name(*d).to_lowercase();
            lowered == name || lowered == name[..3]
        })
        .ok_or_else(|| ValidationError::UnknownWeekday(token.trim().to_string()))
}

/// Parses a comma-separated selection such as `"mon, Wednesday"`.
///
/// Blank tokens are ignored and duplicates collapse. An input naming no day
/// at all yields an empty set; rejecting that is left to parameter validation.
pub fn parse_weekdays(input: &str) -> Result<WeekdaySet, ValidationError> {
    let mut set = WeekdaySet::new();
    for token in input.split(',').filter(|t| !t.trim().is_empty()) {
        set.insert(parse_weekday(token)?)?;
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_and_short_names() {
        let set = parse_weekdays("Monday,wed, FRI").unwrap();
        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Wed));
        assert!(set.contains(Weekday::Fri));
        assert!(!set.contains(Weekday::Tue));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn duplicates_collapse() {
        let set = parse_weekdays("mon,Monday,MON").unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn blank_input_is_empty_set() {
        let set = parse_weekdays(" , ").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_name_rejected() {
        let err = parse_weekdays("mon,funday").unwrap_err();
        assert_eq!(err, ValidationError::UnknownWeekday("funday".into()));
    }

    #[test]
    fn weekend_rejected() {
        assert!(parse_weekdays("saturday").is_err());
        let mut set = WeekdaySet::new();
        assert!(set.insert(Weekday::Sun).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn display_lists_days_in_calendar_order() {
        let set = parse_weekdays("fri,mon").unwrap();
        assert_eq!(set.to_string(), "Monday, Friday");
    }

    #[test]
    fn from_days_keeps_calendar_order() {
        let set = WeekdaySet::from_days([Weekday::Thu, Weekday::Tue]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Weekday::Tue, Weekday::Thu]);
    }
}
