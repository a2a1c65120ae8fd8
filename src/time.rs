//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;

/// DateTime in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Get the current time in UTC.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime into the date stamp used in the credential scope: "20220313".
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a datetime into the ISO 8601 basic format used by X-Amz-Date: "20220313T072004Z".
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse an RFC 3339 timestamp like "2022-03-13T07:20:04Z".
///
/// Callers wrap the error into their own taxonomy; a bad timestamp by itself
/// only says the input was malformed.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::config_invalid(format!("failed to parse timestamp {s}")).with_source(e))?;
    Ok(t.with_timezone(&Utc))
}
