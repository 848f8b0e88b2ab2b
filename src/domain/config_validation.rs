//! Configuration validation.
//!
//! Every key is optional. A key that is present must hold a usable value.

use crate::domain::credential::AuthScheme;
use crate::domain::error::HomeOfficeError;
use crate::domain::weekday::{WeekdaySet, parse_weekdays};
use crate::ports::config_port::ConfigPort;

pub const LUCCA_SECTION: &str = "lucca";
pub const LEAVE_SECTION: &str = "leave";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), HomeOfficeError> {
    config_host(config)?;
    config_auth(config)?;
    config_owner_id(config)?;
    config_timeout_secs(config)?;
    config_days(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> HomeOfficeError {
    HomeOfficeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn config_host(config: &dyn ConfigPort) -> Result<Option<String>, HomeOfficeError> {
    match config.get_non_empty(LUCCA_SECTION, "host") {
        Some(host) if host.starts_with("https://") || host.starts_with("http://") => Ok(Some(host)),
        Some(_) => Err(invalid(
            LUCCA_SECTION,
            "host",
            "host must start with http:// or https://",
        )),
        None => Ok(None),
    }
}

pub fn config_auth(config: &dyn ConfigPort) -> Result<Option<AuthScheme>, HomeOfficeError> {
    config
        .get_non_empty(LUCCA_SECTION, "auth")
        .map(|v| v.parse::<AuthScheme>().map_err(|e| invalid(LUCCA_SECTION, "auth", e)))
        .transpose()
}

pub fn config_credential(config: &dyn ConfigPort) -> Option<String> {
    config.get_non_empty(LUCCA_SECTION, "credential")
}

fn config_u64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<u64>, HomeOfficeError> {
    config
        .get_non_empty(section, key)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| invalid(section, key, format!("'{v}' is not a non-negative integer")))
        })
        .transpose()
}

pub fn config_owner_id(config: &dyn ConfigPort) -> Result<Option<u64>, HomeOfficeError> {
    config_u64(config, LUCCA_SECTION, "owner_id")
}

pub fn config_timeout_secs(config: &dyn ConfigPort) -> Result<Option<u64>, HomeOfficeError> {
    match config_u64(config, LUCCA_SECTION, "timeout_secs")? {
        Some(0) => Err(invalid(
            LUCCA_SECTION,
            "timeout_secs",
            "timeout_secs must be at least 1",
        )),
        other => Ok(other),
    }
}

pub fn config_days(config: &dyn ConfigPort) -> Result<Option<WeekdaySet>, HomeOfficeError> {
    config
        .get_non_empty(LEAVE_SECTION, "days")
        .map(|v| parse_weekdays(&v).map_err(|e| invalid(LEAVE_SECTION, "days", e.to_string())))
        .transpose()
}

pub fn config_include_owner_name(config: &dyn ConfigPort) -> bool {
    config.get_bool(LEAVE_SECTION, "include_owner_name", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use chrono::Weekday;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: HomeOfficeError) -> String {
        match err {
            HomeOfficeError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_config(&config("")).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let c = config(
            "[lucca]\nhost = https://acme.ilucca.net\nauth = bearer\ncredential = tok\n\
             owner_id = 42\ntimeout_secs = 10\n[leave]\ndays = mon, thu\ninclude_owner_name = yes\n",
        );
        assert!(validate_config(&c).is_ok());
        assert_eq!(config_host(&c).unwrap().as_deref(), Some("https://acme.ilucca.net"));
        assert_eq!(config_auth(&c).unwrap(), Some(AuthScheme::Bearer));
        assert_eq!(config_credential(&c).as_deref(), Some("tok"));
        assert_eq!(config_owner_id(&c).unwrap(), Some(42));
        assert_eq!(config_timeout_secs(&c).unwrap(), Some(10));
        let days = config_days(&c).unwrap().unwrap();
        assert!(days.contains(Weekday::Mon) && days.contains(Weekday::Thu));
        assert!(config_include_owner_name(&c));
    }

    #[test]
    fn host_without_scheme_rejected() {
        let err = validate_config(&config("[lucca]\nhost = acme.ilucca.net\n")).unwrap_err();
        assert_eq!(invalid_key(err), "host");
    }

    #[test]
    fn unknown_auth_rejected() {
        let err = validate_config(&config("[lucca]\nauth = basic\n")).unwrap_err();
        assert_eq!(invalid_key(err), "auth");
    }

    #[test]
    fn non_numeric_owner_rejected() {
        let err = validate_config(&config("[lucca]\nowner_id = me\n")).unwrap_err();
        assert_eq!(invalid_key(err), "owner_id");
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = validate_config(&config("[lucca]\ntimeout_secs = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "timeout_secs");
    }

    #[test]
    fn weekend_day_rejected() {
        let err = validate_config(&config("[leave]\ndays = mon, sun\n")).unwrap_err();
        assert_eq!(invalid_key(err), "days");
    }

    #[test]
    fn include_owner_name_defaults_off() {
        assert!(!config_include_owner_name(&config("[leave]\n")));
    }
}
