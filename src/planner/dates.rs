use chrono::{Datelike, Days, NaiveDate};

/// Whole calendar days from `today` until `date`; negative for past dates.
pub fn days_until(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Sunday..=Saturday bounds of the week containing `today`, clamped to the
/// representable date range.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(today.weekday().num_days_from_sunday());
    let start = today
        .checked_sub_days(Days::new(offset))
        .unwrap_or(NaiveDate::MIN);
    let end = today
        .checked_add_days(Days::new(6 - offset))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

pub fn within(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}
