//! Reduction of the provider's 3-hourly forecast series to one sample per day.

use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;

use crate::model::{DailyForecast, ForecastEntry};

/// Midday is the slot the provider reports for every returned day.
pub const REPRESENTATIVE_HOUR: u32 = 12;

/// Whether `time` is exactly `REPRESENTATIVE_HOUR:00:00`.
pub fn is_representative(time: NaiveTime) -> bool {
    time.hour() == REPRESENTATIVE_HOUR
        && time.minute() == 0
        && time.second() == 0
        && time.nanosecond() == 0
}

/// Pick the midday sample of each calendar day, in chronological order.
///
/// Days without a sample at exactly the representative hour are dropped;
/// nothing is interpolated. An empty result is not an error.
pub fn reduce(series: &[ForecastEntry]) -> DailyForecast {
    let mut midday: Vec<&ForecastEntry> = series
        .iter()
        .filter(|e| is_representative(e.local_time.time()))
        .collect();
    // Stable, so duplicate slots keep input order.
    midday.sort_by_key(|e| e.local_time);

    let mut seen = HashSet::new();
    midday
        .into_iter()
        .filter(|e| seen.insert(e.local_time.date()))
        .cloned()
        .collect()
}
