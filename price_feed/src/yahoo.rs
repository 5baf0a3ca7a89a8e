//! Yahoo Finance chart API client
//!
//! Fetches daily close prices for quoted symbols (futures such as
//! `CL=F`, equities such as `XOM`) over a named range like `1y`.

use chrono::DateTime;
use serde::Deserialize;

use crate::error::{FeedError, Result};
use crate::PriceRow;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// The chart endpoint rejects requests without a browser user agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance API response structures
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartNode>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance client
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    http: reqwest::Client,
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooClient {
    /// Create a client against the public chart endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint, for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch daily closes for `symbol` over `range` (`5d`, `1mo`, `1y`, ...).
    ///
    /// Rows come back oldest first; days without a close are skipped.
    pub async fn history(&self, symbol: &str, range: &str) -> Result<Vec<PriceRow>> {
        let url = format!("{}/{}", self.base_url, symbol);

        let body = self
            .http
            .get(&url)
            .query(&[("range", range), ("interval", "1d")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_chart(&body, symbol)
    }

    /// Latest available close for `symbol` within `range`.
    pub async fn last_close(&self, symbol: &str, range: &str) -> Result<f64> {
        let rows = self.history(symbol, range).await?;

        rows.last()
            .map(|row| row.price)
            .ok_or_else(|| no_data(symbol, "empty history"))
    }
}

/// Parse a chart API response body into dated close rows.
fn parse_chart(body: &str, symbol: &str) -> Result<Vec<PriceRow>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|err| FeedError::UnexpectedResponse {
            source: "yahoo",
            detail: err.to_string(),
        })?;

    if let Some(error) = envelope.chart.error {
        return Err(no_data(
            symbol,
            &format!("{}: {}", error.code, error.description),
        ));
    }

    let node = envelope
        .chart
        .result
        .and_then(|mut nodes| {
            if nodes.is_empty() {
                None
            } else {
                Some(nodes.remove(0))
            }
        })
        .ok_or_else(|| no_data(symbol, "empty chart result"))?;

    let quote = node
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| no_data(symbol, "missing quote block"))?;

    let mut rows = Vec::with_capacity(node.timestamp.len());
    for (timestamp, close) in node.timestamp.iter().zip(quote.close) {
        // Skip days without a close (holidays, live sessions)
        let price = match close {
            Some(price) => price,
            None => continue,
        };
        let stamp = match DateTime::from_timestamp(*timestamp, 0) {
            Some(stamp) => stamp,
            None => continue,
        };
        rows.push(PriceRow {
            date: stamp.date_naive(),
            price,
        });
    }

    if rows.is_empty() {
        return Err(no_data(symbol, "no usable close prices"));
    }

    Ok(rows)
}

fn no_data(symbol: &str, detail: &str) -> FeedError {
    FeedError::NoData {
        source: "yahoo",
        symbol: symbol.to_string(),
        detail: detail.to_string(),
    }
}
