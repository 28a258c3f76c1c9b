use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Display pattern for timestamps (month/day/year, 12-hour clock)
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Format a byte count as kilobytes with two decimals
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}

/// Format a server timestamp in the local time zone
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

/// Format a server timestamp in the given time zone.
/// Timestamps without an offset are taken as UTC; unparseable input is returned as-is.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Utc.from_utc_datetime(&naive)
            .with_timezone(tz)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    } else {
        raw.to_string()
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
