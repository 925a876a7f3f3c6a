use crate::config::EngineConfig;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use log::trace;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Error, Debug, Eq, PartialEq)]
pub enum CalendarError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("year {0} cannot be represented")]
    InvalidYear(i32),
}

/// Midnight UTC on the first day of a month. `month` is 1-based.
pub fn start_of_month(month: u32, year: i32) -> Result<DateTime<Utc>, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }

    let midnight = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(CalendarError::InvalidYear(year))?;

    Ok(Utc.from_utc_datetime(&midnight))
}

/// Whole weeks between `now` and the first day of the given month.
///
/// Partial weeks are dropped, and a month that has already started yields zero
/// rather than a negative count.
pub fn weeks_until(month: u32, year: i32, now: DateTime<Utc>) -> Result<u32, CalendarError> {
    let start = start_of_month(month, year)?;

    // `num_weeks` truncates towards zero, which is a floor for the positive case
    // and the negative case is clamped anyway.
    let weeks = (start - now).num_weeks().max(0) as u32;
    trace!("{} weeks between {} and {}", weeks, now, start);

    Ok(weeks)
}

/// Whether a departure in (month, year) can still be booked as of `now`.
///
/// The first of the month must be strictly later than `now` and the year must be
/// inside the configured window.
pub fn is_valid_future_date(month: u32, year: i32, now: DateTime<Utc>, config: &EngineConfig) -> bool {
    if !config.is_year_accepted(year) {
        return false;
    }

    match start_of_month(month, year) {
        Ok(start) => start > now,
        Err(_) => false,
    }
}

/// The departure years a traveller can pick from: the current year (or the start of
/// the window, if later) through the end of the window.
pub fn selectable_years(now: DateTime<Utc>, config: &EngineConfig) -> Vec<i32> {
    let first = config.min_year.max(now.year());
    (first..=config.max_year).collect()
}

/// (number, name) pairs for every month, January first.
pub fn month_options() -> Vec<(u32, &'static str)> {
    MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (i as u32 + 1, *name))
        .collect()
}

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}
