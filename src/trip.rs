use crate::{calendar, config::EngineConfig};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// How long the traveller stays and when they leave.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TripParameters {
    weeks: u32,
    start_month: u32,
    start_year: i32,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum TripError {
    #[error("trip length must be between 1 and {1} weeks, got {0}")]
    WeeksOutOfRange(u32, u32), // weeks, max
    #[error("start month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
    #[error("start year must be between {1} and {2}, got {0}")]
    YearOutOfRange(i32, i32, i32), // year, min, max
}

impl TripParameters {
    /// Build trip parameters, rejecting anything outside the ranges the formulas are
    /// calibrated for. Values are never clamped.
    ///
    /// This does not check that the departure is still in the future; that depends
    /// on the clock and is left to `is_departure_in_future`.
    pub fn new(
        weeks: u32,
        start_month: u32,
        start_year: i32,
        config: &EngineConfig,
    ) -> Result<Self, TripError> {
        if weeks == 0 || weeks > config.max_trip_weeks {
            return Err(TripError::WeeksOutOfRange(weeks, config.max_trip_weeks));
        }
        if !(1..=12).contains(&start_month) {
            return Err(TripError::MonthOutOfRange(start_month));
        }
        if !config.is_year_accepted(start_year) {
            return Err(TripError::YearOutOfRange(
                start_year,
                config.min_year,
                config.max_year,
            ));
        }

        Ok(TripParameters {
            weeks,
            start_month,
            start_year,
        })
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn is_departure_in_future(&self, now: DateTime<Utc>, config: &EngineConfig) -> bool {
        calendar::is_valid_future_date(self.start_month, self.start_year, now, config)
    }

    /// Whole weeks left to save before departure.
    pub fn weeks_until_departure(&self, now: DateTime<Utc>) -> u32 {
        // The month was range checked on construction
        calendar::weeks_until(self.start_month, self.start_year, now).unwrap_or(0)
    }
}
