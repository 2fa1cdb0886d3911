//! Calendar arithmetic for reference months.
//!
//! A reference month is represented by its first day. All navigation and
//! date shifting lives here so the services never do ad-hoc date math.

use chrono::{Datelike, NaiveDate};

/// First day of the given `(year, month)`, or `None` for an invalid month.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First day of the month after `current`.
pub fn next_month(current: NaiveDate) -> NaiveDate {
    let (year, month) = if current.month() == 12 {
        (current.year() + 1, 1)
    } else {
        (current.year(), current.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(current)
}

/// First day of the month before `current`.
pub fn previous_month(current: NaiveDate) -> NaiveDate {
    let (year, month) = if current.month() == 1 {
        (current.year() - 1, 12)
    } else {
        (current.year(), current.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(current)
}

/// Number of days in the month containing `month_start`.
pub fn days_in_month(month_start: NaiveDate) -> u32 {
    next_month(month_start).pred_opt().map(|d| d.day()).unwrap_or(28)
}

/// Move a date into the target month keeping the same day of month.
///
/// When the day does not exist there (e.g. Jan 31 into February) it is
/// clamped to the target month's last day.
pub fn shift_to_month(original: NaiveDate, target_month: NaiveDate) -> NaiveDate {
    let day = original.day().min(days_in_month(target_month));
    NaiveDate::from_ymd_opt(target_month.year(), target_month.month(), day)
        .unwrap_or(target_month)
}
