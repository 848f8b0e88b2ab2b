//! Run summary tallied from the log.

use crate::domain::reconcile::LogEntry;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub submitted: usize,
    pub already_taken: usize,
    pub planned: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, entry: &LogEntry) {
        match entry {
            LogEntry::Attempt(_) => self.attempted += 1,
            LogEntry::AlreadyTaken(_) => self.already_taken += 1,
            LogEntry::Submitted(_) => self.submitted += 1,
            LogEntry::Planned(_) => self.planned += 1,
            LogEntry::Failed { .. } => self.failed += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl<'a> FromIterator<&'a LogEntry> for RunSummary {
    fn from_iter<I: IntoIterator<Item = &'a LogEntry>>(iter: I) -> Self {
        let mut summary = RunSummary::default();
        for entry in iter {
            summary.record(entry);
        }
        summary
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days: {} requested, {} already taken, {} failed",
            self.attempted, self.submitted, self.already_taken, self.failed
        )?;
        if self.planned > 0 {
            write!(f, ", {} would be requested", self.planned)?;
        }
        Ok(())
    }
}
