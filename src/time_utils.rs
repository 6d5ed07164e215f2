// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and conversion.

use chrono::{DateTime, Datelike, LocalResult, Months, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert epoch milliseconds to a UTC instant truncated to whole seconds.
///
/// Returns `None` if the value is outside chrono's representable range.
pub fn millis_to_utc_seconds(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(millis.div_euclid(1000), 0)
}

/// Format a date as a `YYYY-MM` month label.
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Midnight of `date` in `tz`, as epoch seconds.
///
/// Ambiguous local times resolve to the earlier instant. A midnight that
/// falls in a DST gap is treated as UTC midnight.
pub fn local_midnight_epoch<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        LocalResult::None => naive.and_utc().timestamp(),
    }
}

/// `date` advanced by `months` calendar months, clamped to the month's end.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}
