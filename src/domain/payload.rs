//! Leave-creation request body.
//!
//! The body is the platform's remote-work template with three fields
//! overridden per day: `startsOn`, `endsOn` and `ownerId`.

use chrono::NaiveDate;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// Revision of the template below; bump when the platform schema changes.
pub const TEMPLATE_REVISION: &str = "2023-04";

static REMOTE_WORK_TEMPLATE: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "daysUnit": true,
        "displayAllUnits": false,
        "warnings": [],
        "agreementWarnings": [],
        "balanceEstimateEndsOn": "2023-04-30T00:00:00",
        "availableAccounts": [],
        "otherAvailableAccounts": [
            {
                "leaveAccountId": 32,
                "leaveAccountName": "_Télétravail",
                "unit": 0,
                "duration": 1,
                "isRemoteWork": true,
                "constraint": {
                    "allowOuterConsumption": 0,
                    "durationHour": 0,
                    "stepHour": 0.5,
                    "entitlementEndDateBalance": null,
                    "warnings": []
                }
            }
        ],
        "daysOff": {},
        "unlimitedDaysOffCalculation": false,
        "isValid": true,
        "areSupportingDocumentsManaged": true,
        "withCandidate": false,
        "startsAM": true,
        "endsAM": false,
        "isHalfDay": false,
        "unit": 0,
        "autoCreate": true
    })
});

pub fn remote_work_template() -> &'static Value {
    &REMOTE_WORK_TEMPLATE
}

/// Renders a day as the platform's midnight timestamp, `YYYY-MM-DDT00:00:00`.
pub fn midnight_timestamp(day: NaiveDate) -> String {
    day.format("%Y-%m-%dT00:00:00").to_string()
}

/// Builds the full-day remote-work request for `day`.
pub fn leave_request(day: NaiveDate, owner_id: u64, owner_name: Option<&str>) -> Value {
    let mut body = REMOTE_WORK_TEMPLATE.clone();
    if let Value::Object(fields) = &mut body {
        let stamp = midnight_timestamp(day);
        fields.insert("startsOn".into(), Value::String(stamp.clone()));
        fields.insert("endsOn".into(), Value::String(stamp));
        fields.insert("ownerId".into(), Value::from(owner_id));
        if let Some(name) = owner_name {
            fields.insert("ownerName".into(), Value::String(name.to_string()));
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_dates_and_owner() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let body = leave_request(day, 4242, None);
        assert_eq!(body["startsOn"], "2024-01-03T00:00:00");
        assert_eq!(body["endsOn"], "2024-01-03T00:00:00");
        assert_eq!(body["ownerId"], 4242);
        assert!(body.get("ownerName").is_none());
    }

    #[test]
    fn keeps_template_fields() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let body = leave_request(day, 1, None);
        assert_eq!(body["autoCreate"], true);
        assert_eq!(body["isHalfDay"], false);
        assert_eq!(body["otherAvailableAccounts"][0]["isRemoteWork"], true);
        assert_eq!(body["otherAvailableAccounts"][0]["leaveAccountId"], 32);
    }

    #[test]
    fn owner_name_added_when_given() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let body = leave_request(day, 1, Some("Jane Doe"));
        assert_eq!(body["ownerName"], "Jane Doe");
    }

    #[test]
    fn template_revision_matches_balance_window() {
        let ends = remote_work_template()["balanceEstimateEndsOn"].as_str().unwrap();
        assert!(ends.starts_with(TEMPLATE_REVISION));
    }

    #[test]
    fn template_is_untouched_by_requests() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let _ = leave_request(day, 1, Some("x"));
        assert!(remote_work_template().get("startsOn").is_none());
        assert!(remote_work_template().get("ownerName").is_none());
    }
}
