//! Core domain types and logic.

pub mod weekday;
pub mod credential;
pub mod params;
pub mod calendar;
pub mod leave;
pub mod payload;
pub mod session;
pub mod reconcile;
pub mod summary;
pub mod config_validation;
pub mod error;
