//! EIA open-data API client
//!
//! Fetches official energy statistics series (spot prices) from the
//! EIA v2 `seriesid` endpoint, which wraps legacy v1 series ids.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{FeedError, Result};
use crate::PriceRow;

const DEFAULT_BASE_URL: &str = "https://api.eia.gov";

/// Daily WTI crude oil spot price, the default series.
pub const WTI_DAILY: &str = "PET.RWTC.D";

/// Daily Brent crude oil spot price.
pub const BRENT_DAILY: &str = "PET.RBRTE.D";

/// Monthly Henry Hub natural gas spot price.
pub const HENRY_HUB_MONTHLY: &str = "NG.RNGWHHD.M";

/// EIA API client.
///
/// The API token is injected at construction; the client never reads
/// the process environment itself.
#[derive(Debug, Clone)]
pub struct EiaClient {
    token: String,
    base_url: String,
    http: reqwest::Client,
}

impl EiaClient {
    /// Create a client against the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint, for tests.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch every observation of `series_id`, oldest first.
    pub async fn series(&self, series_id: &str) -> Result<Vec<PriceRow>> {
        if looks_like_ticker(series_id) {
            return Err(FeedError::InvalidSeriesId(series_id.to_string()));
        }

        let url = format!("{}/v2/seriesid/{}", self.base_url, series_id);
        let body: Value = self
            .http
            .get(&url)
            .query(&[("api_key", self.token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_series(&body, series_id)
    }
}

/// Quote tickers carry an `=` (`CL=F`, `BZ=F`); EIA ids never do.
fn looks_like_ticker(series_id: &str) -> bool {
    series_id.contains('=')
}

/// Extract dated observations from a v2 seriesid payload.
///
/// The row array normally sits at `response.data`; older deployments
/// answer with top-level `data` or `series`, so those are tried next.
fn parse_series(body: &Value, series_id: &str) -> Result<Vec<PriceRow>> {
    let rows = body
        .pointer("/response/data")
        .or_else(|| body.get("data"))
        .or_else(|| body.get("series"))
        .and_then(Value::as_array);

    let rows = match rows {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            let detail = body
                .get("error")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("empty response")
                .to_string();
            return Err(no_data(series_id, detail));
        }
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let period = match row.get("period").and_then(Value::as_str) {
            Some(period) => period,
            None => continue,
        };
        // Values arrive as numbers or as quoted strings depending on
        // the series
        let value = match row.get("value") {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.parse::<f64>().ok(),
            _ => None,
        };
        match (parse_period(period), value) {
            (Some(date), Some(price)) if price.is_finite() => {
                out.push(PriceRow { date, price })
            }
            _ => {}
        }
    }

    if out.is_empty() {
        return Err(no_data(series_id, "no parseable observations".to_string()));
    }

    // The API pages newest first
    out.sort_by_key(|row| row.date);

    Ok(out)
}

/// Daily series use `%Y-%m-%d` periods, monthly series `%Y-%m`, which
/// maps to the first of the month.
fn parse_period(period: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(period, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d").ok()
}

fn no_data(series_id: &str, detail: String) -> FeedError {
    FeedError::NoData {
        source: "eia",
        symbol: series_id.to_string(),
        detail,
    }
}
