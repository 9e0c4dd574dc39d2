use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Counts Monday-Friday days after `start` up to and including `end`, less `holidays`.
///
/// The entry day never counts as downtime while the exit day does. The result is
/// clamped at zero, so an inverted range or an oversized holiday count yields `0`.
pub fn count_business_days(start: NaiveDate, end: NaiveDate, holidays: u32) -> u32 {
    let span = (end - start).num_days();
    if span <= 0 {
        return 0;
    }

    let full_weeks = span / 7;
    let remainder = span % 7;
    let tail = (1..=remainder)
        .map(|offset| start + Duration::days(full_weeks * 7 + offset))
        .filter(|day| is_business_day(*day))
        .count() as i64;

    let raw = full_weeks * 5 + tail;
    let adjusted = raw - i64::from(holidays);
    u32::try_from(adjusted.max(0)).unwrap_or(u32::MAX)
}

pub fn is_business_day(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
