//! Response records shared across handler groups.
//!
//! All wire JSON uses camelCase keys; timestamps leave the service as
//! RFC3339 strings even though they are stored as epoch milliseconds.

mod member_record;
mod project_record;
mod task_record;
mod user_record;

pub use member_record::MemberRecord;
pub use project_record::ProjectRecord;
pub use task_record::TaskRecord;
pub use user_record::{UserRecord, UserSummary};

/// Epoch milliseconds to an RFC3339 string for responses.
pub(crate) fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339()
}

/// Parse a request date into epoch milliseconds.
///
/// Accepts full RFC3339 timestamps and plain `YYYY-MM-DD` dates (taken as
/// midnight UTC), matching what API clients actually send.
pub(crate) fn parse_date_millis(value: &str) -> Option<i64> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let millis = parse_date_millis("2025-10-01").unwrap();
        assert_eq!(millis_to_rfc3339(millis), "2025-10-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339() {
        let millis = parse_date_millis("2025-10-01T12:30:00Z").unwrap();
        assert_eq!(millis_to_rfc3339(millis), "2025-10-01T12:30:00+00:00");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_date_millis("next tuesday").is_none());
        assert!(parse_date_millis("").is_none());
    }
}
