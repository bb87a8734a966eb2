use std::str::FromStr;

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

pub const DEFAULT_STATUS: &str = "Active";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicalHistory {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub condition: String,
    pub diagnosis_date: jiff::Timestamp,
    pub treatment: String,
    pub status: String,
    pub created_at: jiff::Timestamp,
}

/// Parse a diagnosis date given as an RFC 3339 timestamp, a civil datetime
/// (`2024-03-01T08:30:00`) or a plain date (`2024-03-01`). Civil values are
/// read as UTC.
pub fn parse_diagnosis_date(value: &str) -> Result<jiff::Timestamp, CoreError> {
    let value = value.trim();
    if let Ok(ts) = jiff::Timestamp::from_str(value) {
        return Ok(ts);
    }

    let invalid = |e: jiff::Error| CoreError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    };

    if let Ok(dt) = jiff::civil::DateTime::from_str(value) {
        return Ok(dt.to_zoned(TimeZone::UTC).map_err(invalid)?.timestamp());
    }

    let date = jiff::civil::Date::from_str(value).map_err(invalid)?;
    Ok(date.to_zoned(TimeZone::UTC).map_err(invalid)?.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_date_as_utc_midnight() {
        let ts = parse_diagnosis_date("2024-03-01").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01T00:00:00Z");
    }

    #[test]
    fn parses_civil_datetime() {
        let ts = parse_diagnosis_date("2024-03-01T08:30:00").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01T08:30:00Z");
    }

    #[test]
    fn parses_offset_timestamp() {
        let ts = parse_diagnosis_date("2024-03-01T08:30:00+02:00").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01T06:30:00Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_diagnosis_date("last tuesday"),
            Err(CoreError::InvalidDate { .. })
        ));
    }
}
