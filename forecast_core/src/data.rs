//! Series normalization: raw tabular input to a clean daily price series

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

/// Column names accepted for the date axis, in priority order.
const DATE_COLUMNS: [&str; 3] = ["date", "timestamp", "time"];

/// Column names accepted for the price axis, in priority order.
const PRICE_COLUMNS: [&str; 2] = ["price", "close"];

/// String date formats tried when the date column is text, in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d", "%m/%d/%Y"];

/// A cleaned price series: one finite price per calendar date, in
/// strictly increasing date order.
///
/// Construction goes through [`SeriesNormalizer`] or [`PriceSeries::from_parts`],
/// both of which enforce the ordering and finiteness invariants, so the
/// accessors never need to re-validate.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// Observation dates, strictly increasing
    dates: Vec<NaiveDate>,
    /// Observed prices, parallel to `dates`
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from parallel date and price vectors.
    ///
    /// Rejects mismatched lengths, empty input, out-of-order or duplicate
    /// dates, and non-finite prices.
    pub fn from_parts(dates: Vec<NaiveDate>, prices: Vec<f64>) -> Result<Self> {
        if dates.len() != prices.len() {
            return Err(ForecastError::Schema(format!(
                "date and price lengths differ: {} vs {}",
                dates.len(),
                prices.len()
            )));
        }
        if dates.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if !dates.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(ForecastError::Schema(
                "dates must be strictly increasing".to_string(),
            ));
        }
        if !prices.iter().all(|price| price.is_finite()) {
            return Err(ForecastError::Schema(
                "prices must be finite numbers".to_string(),
            ));
        }

        Ok(Self { dates, prices })
    }

    /// Observation dates, oldest first.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observed prices, parallel to [`PriceSeries::dates`].
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The most recent observation date.
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// The most recent observed price.
    pub fn last_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    /// Copy out the observations in `start..end`.
    ///
    /// Panics if the range is out of bounds or empty, like slicing a `Vec`.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            dates: self.dates[start..end].to_vec(),
            prices: self.prices[start..end].to_vec(),
        }
    }
}

/// Normalizer turning loosely shaped tables into a [`PriceSeries`]
#[derive(Debug)]
pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Load and normalize a CSV file.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
        let file = File::open(path)?;
        // Use polars DataFrame reader directly
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::normalize(&df)
    }

    /// Parse and normalize in-memory CSV bytes (uploads).
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<PriceSeries> {
        let cursor = Cursor::new(bytes.to_vec());
        let df = CsvReader::new(cursor)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::normalize(&df)
    }

    /// Normalize an arbitrary DataFrame into a clean price series.
    ///
    /// Resolves the date and price columns by name, parses dates, coerces
    /// prices to floats, drops rows where either side is missing, sorts by
    /// date and keeps the last row of any duplicated date.
    pub fn normalize(df: &DataFrame) -> Result<PriceSeries> {
        let date_column = Self::resolve_column(df, &DATE_COLUMNS);
        let price_column = Self::resolve_column(df, &PRICE_COLUMNS);

        let (date_column, price_column) = match (date_column, price_column) {
            (Some(date), Some(price)) => (date, price),
            _ => {
                return Err(ForecastError::Schema(
                    "input must contain a 'date' column and a 'price' (or 'close') column"
                        .to_string(),
                ))
            }
        };

        let dates = Self::extract_dates(df.column(&date_column)?)?;
        let prices = Self::extract_prices(df.column(&price_column)?)?;

        // Keep only rows where both sides parsed
        let mut rows: Vec<(NaiveDate, f64)> = dates
            .into_iter()
            .zip(prices)
            .filter_map(|(date, price)| match (date, price) {
                (Some(date), Some(price)) if price.is_finite() => Some((date, price)),
                _ => None,
            })
            .collect();

        if rows.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        // Stable sort, then collapse duplicate dates keeping the last
        // occurrence from the original row order
        rows.sort_by_key(|(date, _)| *date);

        let mut dates = Vec::with_capacity(rows.len());
        let mut prices = Vec::with_capacity(rows.len());
        for (date, price) in rows {
            if dates.last() == Some(&date) {
                let last = prices.len() - 1;
                prices[last] = price;
            } else {
                dates.push(date);
                prices.push(price);
            }
        }

        Ok(PriceSeries { dates, prices })
    }

    /// Find the first column whose lowercased name matches one of
    /// `candidates`, honoring candidate priority over column order.
    fn resolve_column(df: &DataFrame, candidates: &[&str]) -> Option<String> {
        let column_names = df.get_column_names();

        for candidate in candidates {
            for name in &column_names {
                if name.to_lowercase() == *candidate {
                    return Some(name.to_string());
                }
            }
        }

        None
    }

    /// Parse the date column into calendar dates, one slot per row.
    fn extract_dates(column: &Series) -> Result<Vec<Option<NaiveDate>>> {
        match column.dtype() {
            DataType::Utf8 => Ok(column
                .utf8()?
                .into_iter()
                .map(|value| value.and_then(Self::parse_date_str))
                .collect()),
            DataType::Date => Ok(column
                .date()?
                .into_iter()
                .map(|value| value.and_then(Self::date_from_epoch_days))
                .collect()),
            DataType::Datetime(unit, _) => {
                let unit = *unit;
                Ok(column
                    .datetime()?
                    .into_iter()
                    .map(|value| value.and_then(|ts| Self::date_from_timestamp(ts, unit)))
                    .collect())
            }
            other => Err(ForecastError::Schema(format!(
                "date column '{}' has unsupported type {}",
                column.name(),
                other
            ))),
        }
    }

    /// Coerce the price column to floats, one slot per row.
    ///
    /// Text columns are parsed value by value; anything unparseable
    /// becomes a missing slot rather than an error.
    fn extract_prices(column: &Series) -> Result<Vec<Option<f64>>> {
        let floats = column.cast(&DataType::Float64)?;
        Ok(floats.f64()?.into_iter().collect())
    }

    /// Try the accepted string formats, most common first.
    fn parse_date_str(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Some(date);
            }
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(datetime.date());
            }
        }

        // RFC 3339 timestamps carry an offset the plain formats reject
        if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
            return Some(datetime.date_naive());
        }

        // Monthly granularity ("2024-01") maps to the first of the month
        if raw.len() == 7 {
            if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
                return Some(date);
            }
        }

        None
    }

    fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days as i64))
    }

    fn date_from_timestamp(timestamp: i64, unit: TimeUnit) -> Option<NaiveDate> {
        let seconds = match unit {
            TimeUnit::Nanoseconds => timestamp / 1_000_000_000,
            TimeUnit::Microseconds => timestamp / 1_000_000,
            TimeUnit::Milliseconds => timestamp / 1_000,
        };
        DateTime::from_timestamp(seconds, 0).map(|stamp| stamp.date_naive())
    }
}
