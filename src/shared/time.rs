use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 UTC instant usable inside a file name: `2024-05-01T10-15-30.123Z`.
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-")
}
