use chrono::{DateTime, Local, TimeZone};

/// Timestamps below this are taken to be in seconds, anything else in millis.
const SECONDS_THRESHOLD: i64 = 10_000_000_000;

/// Render a gateway timestamp as `YYYY-MM-DD HH:mm:ss` in local time.
/// Missing or zero timestamps render as `-`.
pub fn format_timestamp(ts: Option<i64>) -> String {
    format_timestamp_in(ts, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(ts: Option<i64>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(ts) = ts.filter(|t| *t != 0) else {
        return "-".into();
    };
    let millis = if ts < SECONDS_THRESHOLD { ts.saturating_mul(1000) } else { ts };
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".into(),
    }
}
