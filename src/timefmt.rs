//! Elapsed/total time labels.

use crate::config::TimeFormat;

/// Format a millisecond duration as zero-padded `MM:SS` or `HH:MM:SS`.
///
/// A negative value means "duration not known yet" and renders as an empty
/// string. In `MM:SS` mode minutes keep counting past 59.
pub fn format_time(ms: i64, format: TimeFormat) -> String {
    if ms < 0 {
        return String::new();
    }
    let secs = ms / 1000;
    match format {
        TimeFormat::MinutesSeconds => format!("{:02}:{:02}", secs / 60, secs % 60),
        TimeFormat::HoursMinutesSeconds => {
            format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
        }
    }
}
