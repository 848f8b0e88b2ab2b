//! Domain error types.

use chrono::NaiveDate;
use std::fmt;

/// Rejected caller input. Raised before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("credential is missing")]
    MissingCredential,

    #[error("malformed credential: {reason}")]
    MalformedCredential { reason: String },

    #[error("invalid date range {from} to {to}: {reason}")]
    InvalidRange {
        from: NaiveDate,
        to: NaiveDate,
        reason: String,
    },

    #[error("no weekday selected")]
    EmptySelection,

    #[error("unknown weekday '{0}' (expected Monday to Friday)")]
    UnknownWeekday(String),
}

/// Which remote call a [`NetworkError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Connect,
    IdentityLookup,
    LeaveQuery,
    Submission,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkErrorKind::Connect => "session setup failed",
            NetworkErrorKind::IdentityLookup => "identity lookup failed",
            NetworkErrorKind::LeaveQuery => "leave query failed",
            NetworkErrorKind::Submission => "leave submission failed",
        };
        f.write_str(label)
    }
}

/// A failed HTTP exchange, with the route it targeted and the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} on {route}: {reason}")]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
    pub route: String,
    pub reason: String,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            route: route.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error type for homeofficinator.
#[derive(Debug, thiserror::Error)]
pub enum HomeOfficeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("unparseable leave record name '{name}'")]
    UnparseableRecord { name: String },

    #[error("session already closed")]
    SessionClosed,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HomeOfficeError> for std::process::ExitCode {
    fn from(err: &HomeOfficeError) -> Self {
        let code: u8 = match err {
            HomeOfficeError::Io(_) => 1,
            HomeOfficeError::ConfigParse { .. }
            | HomeOfficeError::ConfigInvalid { .. } => 2,
            HomeOfficeError::Validation(_) => 3,
            HomeOfficeError::Network(_) => 4,
            HomeOfficeError::UnparseableRecord { .. } | HomeOfficeError::SessionClosed => 5,
        };
        std::process::ExitCode::from(code)
    }
}
