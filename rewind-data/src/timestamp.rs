//! Timestamp parsing and formatting.
//!
//! All lookups into the trajectory store happen at whole-second granularity,
//! so the key format produced here must match the key space produced by
//! parsing the source rows. Two textual forms are accepted: ISO-8601 (with
//! an optional trailing offset, `Z` meaning UTC) and `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::error::DataError;

/// Parse a timestamp string, trying ISO-8601 first and the plain
/// space-separated form as a fallback.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, DataError> {
    let trimmed = text.trim();

    // Offset-aware ISO form ("2024-01-01T00:00:00Z", "...+09:00"):
    // normalize to UTC and drop the offset.
    if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(aware.naive_utc());
    }

    // Naive ISO form, optional fractional seconds.
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive);
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| DataError::MalformedTimestamp(text.to_string()))
}

/// Drop the sub-second component.
pub fn truncate_to_second(t: NaiveDateTime) -> NaiveDateTime {
    t.with_nanosecond(0).unwrap_or(t)
}

/// Canonical whole-second key form, `YYYY-MM-DDTHH:MM:SS`.
pub fn format_key(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Date and time texts for the heads-up display.
pub fn format_display(t: NaiveDateTime) -> (String, String) {
    (
        t.format("%Y-%m-%d").to_string(),
        t.format("%H:%M:%S").to_string(),
    )
}

/// Millisecond-precision form for the stage readout.
pub fn format_stage(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}
