//! Timestamp format shared by the query builder, the search service and the
//! CSV report.
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone};

use crate::error::{PpiError, Result};

/// Elasticsearch name of the format produced by [`format_timestamp`].
pub const SEARCH_DATE_FORMAT: &str = "date_time_no_millis";

/// Format of Twitter's `created_at` field, as declared in the index mapping.
pub const TWITTER_DATE_FORMAT: &str = "EEE MMM dd HH:mm:ss Z yyyy";

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `yyyy-MM-dd'T'HH:mm:ssZZ`: whole seconds, `Z` for UTC, `+hh:mm` otherwise.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a bucket label or report timestamp back into an instant.
pub fn parse_timestamp(label: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(label)
        .map_err(|e| PpiError::Timestamp(format!("'{}' is not a valid timestamp: {}", label, e)))
}

/// Parses `YYYY-mm-ddTHH:MM:SS` with an optional `Z`, `+HHMM` or `+HH:MM`
/// offset. Without an offset the local system timezone is applied.
pub fn parse_cli_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(ts);
    }

    let naive = NaiveDateTime::parse_from_str(input, NAIVE_FORMAT).map_err(|e| {
        PpiError::Timestamp(format!(
            "'{}' does not match YYYY-mm-ddTHH:MM:SS[+ZZZZ]: {}",
            input, e
        ))
    })?;
    tracing::info!("Adding local time zone to {}.", input);
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|ts| ts.fixed_offset())
        .ok_or_else(|| {
            PpiError::Timestamp(format!(
                "'{}' is ambiguous or does not exist in the local time zone",
                input
            ))
        })
}
