//! Structured incident reports with school/parent notification tracking

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Severity;

/// A structured incident report filed through the guided form.
///
/// Unlike [`super::Report`], the severity here is supplied by the caller and
/// the record carries a human-readable reference id (`RPT-{year}-{NNNN}`)
/// handed back to the reporter for follow-up.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Incident {
    pub id: Uuid,
    pub reference_id: String,
    pub incident_type: String,
    pub severity: Severity,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witnesses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub reporter_type: String,
    pub anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    pub school_notification: bool,
    pub parent_notification: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new incident
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub incident_type: String,
    pub severity: Severity,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub witnesses: Option<String>,
    pub evidence: Option<String>,
    pub reporter_type: String,
    pub anonymous: bool,
    pub contact_info: Option<String>,
    pub school_notification: bool,
    pub parent_notification: bool,
}

/// Format a reference id from a sequence value.
///
/// The sequence lives in the database so ids stay unique and monotonic across
/// server instances and restarts.
pub fn format_reference_id(year: i32, sequence: i64) -> String {
    format!("RPT-{}-{:04}", year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_id_is_zero_padded() {
        assert_eq!(format_reference_id(2026, 7), "RPT-2026-0007");
        assert_eq!(format_reference_id(2026, 1234), "RPT-2026-1234");
    }

    #[test]
    fn reference_id_does_not_truncate_large_sequences() {
        assert_eq!(format_reference_id(2027, 54321), "RPT-2027-54321");
    }
}
