//! # Price Feed
//!
//! Remote price series adapters for the forecast service.
//!
//! Two sources are supported: the Yahoo Finance chart API for market
//! quotes (futures, equities) and the EIA open-data API for official
//! energy statistics. Both produce plain `(date, price)` rows that
//! [`to_dataframe`] lifts into the table shape the evaluation core
//! normalizes.
//!
//! ## Example
//!
//! ```no_run
//! use price_feed::{to_dataframe, YahooClient};
//!
//! #[tokio::main]
//! async fn main() -> price_feed::Result<()> {
//!     let yahoo = YahooClient::new();
//!     let rows = yahoo.history("CL=F", "1y").await?;
//!     let df = to_dataframe(&rows)?;
//!     println!("{} rows fetched", df.height());
//!     Ok(())
//! }
//! ```

pub mod eia;
pub mod error;
pub mod yahoo;

// Re-export commonly used types
pub use crate::eia::EiaClient;
pub use crate::error::{FeedError, Result};
pub use crate::yahoo::YahooClient;

use chrono::NaiveDate;
use polars::prelude::*;

/// A single dated observation from a remote source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    /// Observation date
    pub date: NaiveDate,
    /// Observed price
    pub price: f64,
}

/// Lift adapter rows into the two-column table consumed downstream,
/// with `date` as ISO strings and `price` as floats.
pub fn to_dataframe(rows: &[PriceRow]) -> Result<DataFrame> {
    let dates: Vec<String> = rows
        .iter()
        .map(|row| row.date.format("%Y-%m-%d").to_string())
        .collect();
    let prices: Vec<f64> = rows.iter().map(|row| row.price).collect();

    let df = DataFrame::new(vec![
        Series::new("date", dates),
        Series::new("price", prices),
    ])?;

    Ok(df)
}
