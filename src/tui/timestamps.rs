use std::fmt::Display;

use chrono::{DateTime, Datelike, TimeZone};

/// Chat header time:
/// - same day: "14:05"
/// - same year: "Mar 3 14:05"
/// - older: "Mar 3, 2024"
pub fn format_entry_time<Tz>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if timestamp.date_naive() == now.date_naive() {
        timestamp.format("%H:%M").to_string()
    } else if timestamp.year() == now.year() {
        timestamp.format("%b %-d %H:%M").to_string()
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

/// Wall-clock time of a search, shown on result meta lines
pub fn format_clock<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format("%H:%M:%S").to_string()
}
