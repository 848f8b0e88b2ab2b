//! HR platform access port trait.

use crate::domain::error::NetworkError;
use crate::domain::leave::LeaveListing;
use chrono::NaiveDate;
use serde_json::Value;

/// One authenticated connection to the HR platform.
///
/// Implementations carry the credential at connection level; no method takes
/// it per call.
pub trait LeavePort {
    /// Numeric id of the authenticated user.
    fn current_user_id(&self) -> Result<u64, NetworkError>;

    /// Leave records owned by `owner_id` overlapping `[from, to]`.
    fn list_leaves(
        &self,
        owner_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LeaveListing, NetworkError>;

    /// Posts one creation request and returns the HTTP status, whatever it is.
    /// `Err` is reserved for transport failures.
    fn create_leave(&self, payload: &Value) -> Result<u16, NetworkError>;

    /// Releases the connection.
    fn close(&mut self) {}
}
