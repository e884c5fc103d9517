use chrono::{DateTime, Utc};
use mcq_core::time::format_countdown;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Wall time between two stamps as `M:SS`; negative spans render as `0:00`.
#[must_use]
pub fn format_elapsed(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> String {
    let secs = (completed_at - started_at).num_seconds().max(0);
    format_countdown(u32::try_from(secs).unwrap_or(u32::MAX))
}
