use chrono::{Datelike, NaiveDateTime};

/// Identifies the week containing `now`, e.g. `week-2026-43`.
///
/// Weeks run Monday through Sunday. The number is
/// `ceil((days since Jan 1 + weekday of Jan 1) / 7)` with a Sunday-indexed
/// weekday, so a year starting on Sunday opens with a one-day week 0.
pub fn week_key(now: NaiveDateTime) -> String {
    let date = now.date();
    let days = date.ordinal0();
    // Sunday-indexed weekday of Jan 1, recovered from today's weekday.
    let jan1_weekday = (date.weekday().num_days_from_sunday() + 7 - days % 7) % 7;
    let week = (days + jan1_weekday).div_ceil(7);
    format!("week-{}-{}", date.year(), week)
}

/// Day-of-week ordinal for `now`, 1 = Monday through 7 = Sunday.
pub fn day_ordinal(now: NaiveDateTime) -> u8 {
    ordinal_from_sunday_index(now.weekday().num_days_from_sunday())
}

/// Maps a 0 = Sunday .. 6 = Saturday weekday to a 1 = Monday .. 7 = Sunday ordinal.
pub fn ordinal_from_sunday_index(index: u32) -> u8 {
    match index % 7 {
        0 => 7,
        day => day as u8,
    }
}

pub fn is_valid_ordinal(ordinal: u8) -> bool {
    (1..=7).contains(&ordinal)
}

pub fn day_name(ordinal: u8) -> &'static str {
    match ordinal {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "Unknown",
    }
}

pub fn day_short(ordinal: u8) -> &'static str {
    match ordinal {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        _ => "?",
    }
}
