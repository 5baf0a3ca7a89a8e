//! Backtest scoring, method selection and forward forecast assembly

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};
use crate::methods::Method;
use crate::metrics::{percentage_error, rmse};
use crate::split::{split, TrainTestSplit, DEFAULT_TEST_SIZE};

/// Backtest scores for one method.
#[derive(Debug, Clone)]
pub struct MethodScore {
    /// The scored method
    pub method: Method,
    /// Mean absolute percentage error on the held-out window
    pub mape: f64,
    /// Root mean squared error on the held-out window
    pub rmse: f64,
    /// The method's prediction for the held-out window
    pub predicted: Vec<f64>,
}

/// A single forward forecast point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Calendar date of the projection
    pub date: NaiveDate,
    /// Projected price
    pub forecast: f64,
}

/// The full outcome of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Name of the winning (or forced) method
    pub best_method: String,
    /// Held-out percentage error of that method, rounded to 4 decimals
    pub mape: f64,
    /// Held-out RMSE of that method, rounded to 4 decimals
    pub rmse: f64,
    /// Forward forecast, one point per horizon day
    pub series: Vec<ForecastPoint>,
}

/// Score every registered method against the held-out window.
///
/// Each method trains on the split's prefix only; scores come back in
/// registry order so ties resolve the same way on every run.
pub fn score_methods(split: &TrainTestSplit) -> Result<Vec<MethodScore>> {
    let train = split.train.prices();
    let actual = split.test.prices();

    Method::ALL
        .iter()
        .map(|&method| {
            let predicted = method.forecast(train, actual.len())?;
            Ok(MethodScore {
                method,
                mape: percentage_error(actual, &predicted),
                rmse: rmse(actual, &predicted),
                predicted,
            })
        })
        .collect()
}

/// Pick the winner: lowest MAPE, then lowest RMSE, then registry order.
/// A forced name short-circuits selection but keeps the backtest scores.
fn select<'a>(scores: &'a [MethodScore], forced: Option<&str>) -> Result<&'a MethodScore> {
    if let Some(name) = forced {
        let method: Method = name.parse()?;
        return scores
            .iter()
            .find(|score| score.method == method)
            .ok_or_else(|| ForecastError::UnknownMethod(name.to_string()));
    }

    scores
        .iter()
        .min_by(|a, b| {
            a.mape
                .total_cmp(&b.mape)
                .then_with(|| a.rmse.total_cmp(&b.rmse))
        })
        .ok_or(ForecastError::EmptyData)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Backtest `series`, choose a method and project `horizon` days ahead.
///
/// Selection uses only the held-out window; the chosen method is then
/// retrained on the complete series before projecting. Forecast dates are
/// consecutive calendar days starting the day after the last observation.
/// The reported metrics are rounded, the projected prices are not.
pub fn evaluate(series: &PriceSeries, horizon: usize, method: Option<&str>) -> Result<Evaluation> {
    let parts = split(series, DEFAULT_TEST_SIZE)?;
    let scores = score_methods(&parts)?;
    let chosen = select(&scores, method)?;

    // The forward projection sees the full history, not just the
    // training prefix used for scoring
    let projected = chosen.method.forecast(series.prices(), horizon)?;

    let last_date = series.last_date();
    let points = projected
        .into_iter()
        .enumerate()
        .map(|(offset, forecast)| ForecastPoint {
            date: last_date + Duration::days(offset as i64 + 1),
            forecast,
        })
        .collect();

    Ok(Evaluation {
        best_method: chosen.method.name().to_string(),
        mape: round4(chosen.mape),
        rmse: round4(chosen.rmse),
        series: points,
    })
}
