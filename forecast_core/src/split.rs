//! Train/test partitioning for backtests

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};

/// Minimum number of observations needed before any split is attempted.
pub const MIN_POINTS: usize = 8;

/// Test window requested when the caller expresses no preference.
pub const DEFAULT_TEST_SIZE: usize = 14;

/// A series partitioned into a training prefix and a held-out suffix.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training prefix
    pub train: PriceSeries,
    /// Held-out suffix, the most recent observations
    pub test: PriceSeries,
}

/// Split `series` chronologically for backtesting.
///
/// The held-out window is `requested_test_size` clamped to at least 1 and
/// at most a quarter of the series, so short histories keep most of their
/// observations for training. The same input always produces the same
/// split.
pub fn split(series: &PriceSeries, requested_test_size: usize) -> Result<TrainTestSplit> {
    if series.len() < MIN_POINTS {
        return Err(ForecastError::InsufficientData {
            min: MIN_POINTS,
            len: series.len(),
        });
    }

    let cap = (series.len() / 4).max(1);
    let test_size = requested_test_size.max(1).min(cap);
    let boundary = series.len() - test_size;

    Ok(TrainTestSplit {
        train: series.slice(0, boundary),
        test: series.slice(boundary, series.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_series(len: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..len)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        let prices = (0..len).map(|i| 100.0 + i as f64).collect();
        PriceSeries::from_parts(dates, prices).unwrap()
    }

    #[test]
    fn holds_out_a_quarter_at_most() {
        let split = split(&sample_series(30), 14).unwrap();
        assert_eq!(split.test.len(), 7);
        assert_eq!(split.train.len(), 23);
    }

    #[test]
    fn honors_small_requests() {
        let split = split(&sample_series(100), 3).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 97);
    }

    #[test]
    fn holds_out_at_least_one_point() {
        let split = split(&sample_series(12), 0).unwrap();
        assert_eq!(split.test.len(), 1);
    }

    #[test]
    fn test_window_is_the_most_recent_suffix() {
        let series = sample_series(40);
        let split = split(&series, 14).unwrap();

        assert_eq!(split.test.prices(), &series.prices()[30..]);
        assert_eq!(split.train.last_date(), series.dates()[29]);
        assert_eq!(split.test.last_date(), series.last_date());
    }

    #[test]
    fn train_and_test_reassemble_the_series() {
        let series = sample_series(33);
        let split = split(&series, 14).unwrap();

        let dates: Vec<_> = split
            .train
            .dates()
            .iter()
            .chain(split.test.dates())
            .copied()
            .collect();
        let prices: Vec<_> = split
            .train
            .prices()
            .iter()
            .chain(split.test.prices())
            .copied()
            .collect();

        assert_eq!(dates, series.dates());
        assert_eq!(prices, series.prices());
    }

    #[test]
    fn rejects_short_series() {
        let err = split(&sample_series(7), 14).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { min: 8, len: 7 }
        ));
    }

    #[test]
    fn split_is_deterministic() {
        let series = sample_series(50);
        let first = split(&series, 14).unwrap();
        let second = split(&series, 14).unwrap();

        assert_eq!(first.train, second.train);
        assert_eq!(first.test, second.test);
    }
}
