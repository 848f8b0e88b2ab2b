#![allow(dead_code)]

use chrono::NaiveDate;
use homeofficinator::domain::credential::AuthScheme;
use homeofficinator::domain::error::{NetworkError, NetworkErrorKind};
use homeofficinator::domain::leave::LeaveListing;
use homeofficinator::domain::params::{Params, RawParams};
use homeofficinator::domain::session::Session;
use homeofficinator::domain::weekday::parse_weekdays;
use homeofficinator::ports::leave_port::LeavePort;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Scripted HR platform that records every call made against it.
pub struct FakeBackend {
    pub user_id: Option<u64>,
    pub leave_names: Vec<String>,
    pub principal: Option<String>,
    pub query_error: Option<String>,
    pub statuses: HashMap<NaiveDate, u16>,
    pub transport_failures: HashSet<NaiveDate>,

    pub opened: Cell<u32>,
    pub closed: Cell<u32>,
    pub identity_calls: Cell<u32>,
    pub query_calls: RefCell<Vec<(u64, NaiveDate, NaiveDate)>>,
    pub created: RefCell<Vec<Value>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            user_id: Some(4242),
            leave_names: Vec::new(),
            principal: None,
            query_error: None,
            statuses: HashMap::new(),
            transport_failures: HashSet::new(),
            opened: Cell::new(0),
            closed: Cell::new(0),
            identity_calls: Cell::new(0),
            query_calls: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
        }
    }

    pub fn with_leave(mut self, name: &str) -> Self {
        self.leave_names.push(name.to_string());
        self
    }

    pub fn with_taken(self, day: NaiveDate) -> Self {
        let name = format!("4242-{}-0", day.format("%Y%m%d"));
        self.with_leave(&name)
    }

    pub fn with_principal(mut self, name: &str) -> Self {
        self.principal = Some(name.to_string());
        self
    }

    pub fn with_status(mut self, day: NaiveDate, status: u16) -> Self {
        self.statuses.insert(day, status);
        self
    }

    pub fn with_transport_failure(mut self, day: NaiveDate) -> Self {
        self.transport_failures.insert(day);
        self
    }

    pub fn with_query_error(mut self, reason: &str) -> Self {
        self.query_error = Some(reason.to_string());
        self
    }

    pub fn without_identity(mut self) -> Self {
        self.user_id = None;
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Dates of every creation request received, in order.
    pub fn created_dates(&self) -> Vec<NaiveDate> {
        self.created
            .borrow()
            .iter()
            .map(starts_on)
            .collect()
    }
}

fn starts_on(body: &Value) -> NaiveDate {
    let stamp = body["startsOn"].as_str().unwrap();
    NaiveDate::parse_from_str(&stamp[..10], "%Y-%m-%d").unwrap()
}

pub struct FakeLeavePort {
    backend: Rc<FakeBackend>,
}

impl LeavePort for FakeLeavePort {
    fn current_user_id(&self) -> Result<u64, NetworkError> {
        self.backend
            .identity_calls
            .set(self.backend.identity_calls.get() + 1);
        self.backend.user_id.ok_or_else(|| {
            NetworkError::new(
                NetworkErrorKind::IdentityLookup,
                "/api/v3/users/me",
                "HTTP 401",
            )
        })
    }

    fn list_leaves(
        &self,
        owner_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LeaveListing, NetworkError> {
        self.backend.query_calls.borrow_mut().push((owner_id, from, to));
        if let Some(reason) = &self.backend.query_error {
            return Err(NetworkError::new(
                NetworkErrorKind::LeaveQuery,
                "/api/v3/leaves",
                reason.clone(),
            ));
        }
        Ok(LeaveListing {
            names: self.backend.leave_names.clone(),
            principal: self.backend.principal.clone(),
        })
    }

    fn create_leave(&self, payload: &Value) -> Result<u16, NetworkError> {
        self.backend.created.borrow_mut().push(payload.clone());
        let day = starts_on(payload);
        if self.backend.transport_failures.contains(&day) {
            return Err(NetworkError::new(
                NetworkErrorKind::Submission,
                "/api/v3/leaveRequestFactory",
                "connection reset",
            ));
        }
        Ok(self.backend.statuses.get(&day).copied().unwrap_or(200))
    }

    fn close(&mut self) {
        self.backend.closed.set(self.backend.closed.get() + 1);
    }
}

pub fn fake_session(backend: &Rc<FakeBackend>) -> Session<FakeLeavePort> {
    let backend = Rc::clone(backend);
    Session::new(move || {
        backend.opened.set(backend.opened.get() + 1);
        Ok(FakeLeavePort {
            backend: Rc::clone(&backend),
        })
    })
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn params(from: NaiveDate, to: NaiveDate, days: &str, owner_id: Option<u64>) -> Params {
    Params::validate(RawParams {
        credential: "sid=abc".into(),
        auth: AuthScheme::Cookie,
        date_from: from,
        date_to: to,
        weekdays: parse_weekdays(days).unwrap(),
        owner_id,
    })
    .unwrap()
}
