//! Rendering of `submittedAt` values.

use chrono::{DateTime, Datelike, Local, SecondsFormat, TimeZone, Timelike, Utc};
use configs::TimestampFormat;

/// Format the append instant the way it is written into the records file.
pub fn format_timestamp(now: DateTime<Utc>, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::Iso => now.to_rfc3339_opts(SecondsFormat::Millis, true),
        TimestampFormat::Locale => format_es_co(&now.with_timezone(&Local)),
    }
}

/// es-CO style date time: `15/10/2026, 2:03:07 p. m.`
pub fn format_es_co<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    let (pm, hour) = dt.hour12();
    format!(
        "{}/{}/{}, {}:{:02}:{:02} {}",
        dt.day(),
        dt.month(),
        dt.year(),
        hour,
        dt.minute(),
        dt.second(),
        if pm { "p. m." } else { "a. m." }
    )
}

/// Human display of a stored value: ISO values are shown in local es-CO
/// form, anything else verbatim.
pub fn display_local(stored: &str) -> String {
    match DateTime::parse_from_rfc3339(stored) {
        Ok(dt) => format_es_co(&dt.with_timezone(&Local)),
        Err(_) => stored.to_string(),
    }
}
