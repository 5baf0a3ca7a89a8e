//! API route handlers

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use forecast_core::{evaluate, Evaluation, ForecastError, SeriesNormalizer};
use price_feed::{eia, to_dataframe, FeedError, PriceRow};

use crate::AppState;

/// Largest accepted forecast horizon, in days.
const MAX_HORIZON: usize = 365;

fn default_horizon() -> usize {
    7
}

fn default_ticker() -> String {
    "AAPL".to_string()
}

fn default_quote_period() -> String {
    "5d".to_string()
}

fn default_source() -> String {
    "yahoo".to_string()
}

fn default_history_period() -> String {
    "1y".to_string()
}

/// Error answered to clients: a status code plus a `detail` message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        // Every evaluation failure describes bad client input
        Self::bad_request(err.to_string())
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        let status = match &err {
            FeedError::InvalidSeriesId(_) => StatusCode::BAD_REQUEST,
            FeedError::NoData { .. } => StatusCode::NOT_FOUND,
            FeedError::Http(_) | FeedError::UnexpectedResponse { .. } => StatusCode::BAD_GATEWAY,
            FeedError::Polars(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

fn validate_horizon(horizon: usize) -> Result<usize, ApiError> {
    if (1..=MAX_HORIZON).contains(&horizon) {
        Ok(horizon)
    } else {
        Err(ApiError::bad_request(format!(
            "horizon must be between 1 and {}",
            MAX_HORIZON
        )))
    }
}

/// Run the evaluation pipeline over fetched rows.
fn evaluate_rows(
    rows: &[PriceRow],
    horizon: usize,
    method: Option<&str>,
) -> Result<Evaluation, ApiError> {
    let df = to_dataframe(rows)?;
    let series = SeriesNormalizer::normalize(&df)?;
    Ok(evaluate(&series, horizon, method)?)
}

#[derive(Debug, Deserialize)]
pub struct PriceParams {
    #[serde(default = "default_ticker")]
    ticker: String,
    #[serde(default = "default_quote_period")]
    period: String,
}

/// `GET /api/price`: latest close quote for a ticker.
pub async fn price(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let close = state.yahoo.last_close(&params.ticker, &params.period).await?;

    Ok(Json(json!({
        "ticker": params.ticker.to_uppercase(),
        "close": close,
    })))
}

#[derive(Debug, Deserialize)]
pub struct OnlineParams {
    #[serde(default = "default_source")]
    source: String,
    symbol: Option<String>,
    #[serde(default = "default_history_period")]
    period: String,
    #[serde(default = "default_horizon")]
    horizon: usize,
    method: Option<String>,
}

/// `GET /api/online`: fetch a series from a remote source and evaluate it.
pub async fn online(
    State(state): State<AppState>,
    Query(params): Query<OnlineParams>,
) -> Result<Json<Evaluation>, ApiError> {
    let horizon = validate_horizon(params.horizon)?;
    let symbol = params.symbol.as_deref();

    let rows = match params.source.to_lowercase().as_str() {
        "yahoo" => {
            let symbol = resolve_quote_symbol(symbol);
            tracing::info!(source = "yahoo", %symbol, period = %params.period, "fetching series");
            state.yahoo.history(&symbol, &params.period).await?
        }
        "eia" => {
            let client = state.eia.as_ref().ok_or_else(|| {
                ApiError::bad_request("EIA API key is not configured, set EIA_API_KEY")
            })?;
            let series_id = symbol.unwrap_or(eia::WTI_DAILY);
            tracing::info!(source = "eia", series_id, "fetching series");
            client.series(series_id).await?
        }
        // Convenience source for the Exxon Mobil ticker
        "xm" => {
            let symbol = symbol.unwrap_or("XOM");
            tracing::info!(source = "xm", symbol, period = %params.period, "fetching series");
            state.yahoo.history(symbol, &params.period).await?
        }
        other => {
            return Err(ApiError::bad_request(format!(
                "unknown source '{}', expected 'yahoo', 'eia' or 'xm'",
                other
            )))
        }
    };

    Ok(Json(evaluate_rows(
        &rows,
        horizon,
        params.method.as_deref(),
    )?))
}

/// Map friendly energy names onto quote tickers; `CL=F` (WTI futures)
/// when no symbol is given.
fn resolve_quote_symbol(symbol: Option<&str>) -> String {
    match symbol {
        Some(name) if name.eq_ignore_ascii_case("brent") => "BZ=F".to_string(),
        Some(name) if name.eq_ignore_ascii_case("henry") => "NG=F".to_string(),
        Some(name) => name.to_string(),
        None => "CL=F".to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    #[serde(default = "default_horizon")]
    horizon: usize,
}

/// `POST /api/upload`: evaluate an uploaded CSV of date/price rows.
///
/// Multipart fields: `file` (required, CSV) and `method` (optional
/// forced method name).
pub async fn upload(
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<Evaluation>, ApiError> {
    let horizon = validate_horizon(params.horizon)?;

    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut method: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("invalid multipart body: {}", err)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.csv").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(format!("could not read upload: {}", err)))?;
                upload = Some((filename, content_type, bytes.to_vec()));
            }
            Some("method") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| ApiError::bad_request(format!("could not read method: {}", err)))?;
                if !value.trim().is_empty() {
                    method = Some(value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("missing 'file' field"))?;

    let is_csv = filename.to_lowercase().ends_with(".csv")
        || content_type.as_deref() == Some("text/csv");
    if !is_csv {
        return Err(ApiError::bad_request("only CSV uploads are supported"));
    }

    tracing::info!(%filename, bytes = bytes.len(), "evaluating upload");

    let series = SeriesNormalizer::from_csv_bytes(&bytes)?;
    let evaluation = evaluate(&series, horizon, method.as_deref())?;

    Ok(Json(evaluation))
}

/// `GET /api/eia_status`: whether an EIA token was configured at startup.
pub async fn eia_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "eia_key_present": state.eia.is_some() }))
}
