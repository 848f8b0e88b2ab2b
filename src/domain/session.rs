//! Lazily-opened, release-once session around a [`LeavePort`].

use crate::domain::error::HomeOfficeError;
use crate::ports::leave_port::LeavePort;

type Connector<P> = Box<dyn FnMut() -> Result<P, HomeOfficeError>>;

/// Owns the connection for one reconciliation run.
///
/// The port is opened on first use and closed exactly once, either through
/// [`Session::close`] or when the session is dropped. The owner id is looked
/// up at most once.
pub struct Session<P: LeavePort> {
    connect: Connector<P>,
    port: Option<P>,
    owner_id: Option<u64>,
    closed: bool,
}

impl<P: LeavePort> Session<P> {
    pub fn new(connect: impl FnMut() -> Result<P, HomeOfficeError> + 'static) -> Self {
        Self {
            connect: Box::new(connect),
            port: None,
            owner_id: None,
            closed: false,
        }
    }

    /// Seeds the owner id, skipping the identity lookup.
    pub fn with_owner_id(mut self, owner_id: Option<u64>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    pub fn port(&mut self) -> Result<&P, HomeOfficeError> {
        if self.closed {
            return Err(HomeOfficeError::SessionClosed);
        }
        if self.port.is_none() {
            let port = (self.connect)()?;
            tracing::debug!("session opened");
            self.port = Some(port);
        }
        self.port.as_ref().ok_or(HomeOfficeError::SessionClosed)
    }

    pub fn owner_id(&mut self) -> Result<u64, HomeOfficeError> {
        if let Some(id) = self.owner_id {
            return Ok(id);
        }
        let id = self.port()?.current_user_id()?;
        tracing::debug!(owner_id = id, "owner resolved");
        self.owner_id = Some(id);
        Ok(id)
    }

    /// Releases the port if it was opened. Later calls are no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(mut port) = self.port.take() {
            port.close();
            tracing::debug!("session closed");
        }
    }
}

impl<P: LeavePort> Drop for Session<P> {
    fn drop(&mut self) {
        self.close();
    }
}
