//! Error types for the price_feed crate

use std::error::Error as StdError;
use std::fmt;

/// Errors produced by the remote data source adapters.
///
/// `Display` and `Error` are implemented by hand because the `source`
/// fields name the upstream feed ("yahoo", "eia"), which a derive
/// would otherwise treat as the error cause.
#[derive(Debug)]
pub enum FeedError {
    /// Transport failure or non-success status from the upstream service
    Http(reqwest::Error),

    /// The upstream answered but carried no usable observations
    NoData {
        source: &'static str,
        symbol: String,
        detail: String,
    },

    /// A quotes-style ticker was passed where an EIA series id belongs
    InvalidSeriesId(String),

    /// The upstream payload did not have the documented shape
    UnexpectedResponse {
        source: &'static str,
        detail: String,
    },

    /// Error building the tabular hand-off
    Polars(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Http(err) => write!(f, "upstream request failed: {}", err),
            FeedError::NoData {
                source,
                symbol,
                detail,
            } => write!(
                f,
                "no data returned from {} for '{}': {}",
                source, symbol, detail
            ),
            FeedError::InvalidSeriesId(id) => write!(
                f,
                "invalid series id '{}': looks like a ticker, expected an EIA id such as PET.RWTC.D",
                id
            ),
            FeedError::UnexpectedResponse { source, detail } => {
                write!(f, "unexpected {} response: {}", source, detail)
            }
            FeedError::Polars(detail) => write!(f, "data error: {}", detail),
        }
    }
}

impl StdError for FeedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            FeedError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Http(err)
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, FeedError>;

impl From<polars::prelude::PolarsError> for FeedError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        FeedError::Polars(err.to_string())
    }
}
