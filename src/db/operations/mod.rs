pub mod reviews;
pub mod vocabulary;

use chrono::{DateTime, SecondsFormat, Utc};

/// Canonical stored timestamp form: RFC 3339 UTC with millisecond precision.
/// Fixed width keeps SQL string comparison chronological.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
