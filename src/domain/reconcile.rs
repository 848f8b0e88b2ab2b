//! Leave reconciliation: diff candidate dates against existing leave and
//! submit the missing days, one log entry at a time.

use crate::domain::calendar::{CandidateDates, candidate_dates};
use crate::domain::error::{HomeOfficeError, NetworkError};
use crate::domain::leave::ExistingLeaves;
use crate::domain::params::Params;
use crate::domain::payload::{TEMPLATE_REVISION, leave_request};
use crate::domain::session::Session;
use crate::ports::leave_port::LeavePort;
use chrono::NaiveDate;
use std::fmt;

/// Whether missing days are actually submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Submit,
    DryRun,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub mode: Mode,
    /// Adds the owner's display name to each request body.
    pub include_owner_name: bool,
}

/// Why a single submission did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    Status(u16),
    Transport(String),
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitFailure::Status(code) => write!(f, "{code}"),
            SubmitFailure::Transport(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Attempt(NaiveDate),
    AlreadyTaken(NaiveDate),
    Submitted(NaiveDate),
    Planned(NaiveDate),
    Failed {
        date: NaiveDate,
        failure: SubmitFailure,
    },
}

impl LogEntry {
    pub fn date(&self) -> NaiveDate {
        match self {
            LogEntry::Attempt(d)
            | LogEntry::AlreadyTaken(d)
            | LogEntry::Submitted(d)
            | LogEntry::Planned(d)
            | LogEntry::Failed { date: d, .. } => *d,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Attempt(d) => write!(f, ">>> Trying for {d}..."),
            LogEntry::AlreadyTaken(d) => write!(f, "[x] {d} already taken"),
            LogEntry::Submitted(d) => write!(f, "[+] {d} SUCCESS"),
            LogEntry::Planned(d) => write!(f, "[~] {d} would be requested"),
            LogEntry::Failed { date, failure } => write!(f, "[-] {date} FAILURE : {failure}"),
        }
    }
}

/// Owner the requests are filed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: u64,
    pub name: Option<String>,
}

/// Queries the leave already recorded for `owner_id` within `[from, to]`.
pub fn fetch_existing_leaves<P: LeavePort>(
    session: &mut Session<P>,
    owner_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<ExistingLeaves, HomeOfficeError> {
    let listing = session.port()?.list_leaves(owner_id, from, to)?;
    let existing = ExistingLeaves::from_listing(listing)?;
    tracing::debug!(owner_id, count = existing.len(), "existing leave fetched");
    Ok(existing)
}

/// Lazy log of one reconciliation run.
///
/// Each candidate date yields an [`LogEntry::Attempt`] first; the outcome and
/// any network call happen only when the following entry is pulled.
pub struct Reconciliation<'s, P: LeavePort> {
    session: &'s mut Session<P>,
    owner: Owner,
    existing: ExistingLeaves,
    candidates: CandidateDates,
    pending: Option<NaiveDate>,
    options: ReconcileOptions,
}

/// Builds the lazy reconciliation log over a known set of existing leave.
pub fn reconcile<'s, P: LeavePort>(
    session: &'s mut Session<P>,
    params: &Params,
    owner: Owner,
    existing: ExistingLeaves,
    options: ReconcileOptions,
) -> Reconciliation<'s, P> {
    Reconciliation {
        session,
        owner,
        existing,
        candidates: candidate_dates(params.date_from(), params.date_to(), params.weekdays()),
        pending: None,
        options,
    }
}

/// Resolves the owner, fetches existing leave, then hands back the lazy log.
///
/// An owner id carried by `params` wins over the session's identity lookup.
/// Lookup and query failures abort here, before any submission.
pub fn start<'s, P: LeavePort>(
    session: &'s mut Session<P>,
    params: &Params,
    options: ReconcileOptions,
) -> Result<Reconciliation<'s, P>, HomeOfficeError> {
    let owner_id = match params.owner_id() {
        Some(id) => id,
        None => session.owner_id()?,
    };
    let existing = fetch_existing_leaves(session, owner_id, params.date_from(), params.date_to())?;
    let owner = Owner {
        id: owner_id,
        name: existing.owner_name.clone(),
    };
    Ok(reconcile(session, params, owner, existing, options))
}

impl<P: LeavePort> Reconciliation<'_, P> {
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn existing(&self) -> &ExistingLeaves {
        &self.existing
    }

    fn outcome(&mut self, day: NaiveDate) -> LogEntry {
        if self.existing.contains(day) {
            return LogEntry::AlreadyTaken(day);
        }
        if self.options.mode == Mode::DryRun {
            return LogEntry::Planned(day);
        }

        let owner_name = if self.options.include_owner_name {
            self.owner.name.as_deref()
        } else {
            None
        };
        let body = leave_request(day, self.owner.id, owner_name);
        tracing::debug!(%day, template = TEMPLATE_REVISION, "submitting leave request");

        let result = self
            .session
            .port()
            .map_err(|e| SubmitFailure::Transport(e.to_string()))
            .and_then(|port| {
                port.create_leave(&body)
                    .map_err(|e: NetworkError| SubmitFailure::Transport(e.to_string()))
            });

        match result {
            Ok(status) if (200..300).contains(&status) => LogEntry::Submitted(day),
            Ok(status) => {
                tracing::warn!(%day, status, "leave request rejected");
                LogEntry::Failed {
                    date: day,
                    failure: SubmitFailure::Status(status),
                }
            }
            Err(failure) => {
                tracing::warn!(%day, %failure, "leave request not sent");
                LogEntry::Failed { date: day, failure }
            }
        }
    }
}

impl<P: LeavePort> Iterator for Reconciliation<'_, P> {
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        if let Some(day) = self.pending.take() {
            return Some(self.outcome(day));
        }
        let day = self.candidates.next()?;
        self.pending = Some(day);
        Some(LogEntry::Attempt(day))
    }
}
