//! Relative-time strings for timestamp columns.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;

/// `"<n><unit> ago (<h:mm AM|PM>)"` for `instant` relative to `now`.
///
/// Units step from seconds to minutes to hours to days using whole
/// (floored) values. Instants after `now` count as zero seconds ago.
pub fn time_ago(instant: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> String {
    let clock = instant.with_timezone(&tz).format("%-I:%M %p");
    let seconds = now.signed_duration_since(instant).num_seconds().max(0);

    if seconds < 60 {
        return format!("{seconds}s ago ({clock})");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago ({clock})");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago ({clock})");
    }

    let days = hours / 24;
    format!("{days}d ago ({clock})")
}

/// Read an instant out of a cell value.
///
/// Accepts RFC 3339 strings, naive `YYYY-MM-DDTHH:MM:SS[.f]` strings (taken
/// as UTC) and integer epoch milliseconds.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
