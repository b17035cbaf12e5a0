use chrono::{Local, NaiveDateTime, TimeZone, Utc};

/// Backend timestamp format: UTC, ISO-8601 basic
const BACKEND_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Fields whose values are backend timestamps
pub const DATE_FIELDS: &[&str] = &[
    "entry", "modified", "start", "end", "due", "wait", "scheduled", "until",
];

pub fn is_date_field(field: &str) -> bool {
    DATE_FIELDS.contains(&field)
}

/// Reformat a backend timestamp in local time using a strftime pattern.
/// Values that do not parse are returned unchanged.
pub fn format_date(value: &str, fmt: &str) -> String {
    match NaiveDateTime::parse_from_str(value, BACKEND_FORMAT) {
        Ok(naive) => Utc
            .from_utc_datetime(&naive)
            .with_timezone(&Local)
            .format(fmt)
            .to_string(),
        Err(_) => value.to_string(),
    }
}
