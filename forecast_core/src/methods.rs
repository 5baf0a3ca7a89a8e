//! The fixed registry of forecasting heuristics

use std::fmt;
use std::str::FromStr;

use crate::error::{ForecastError, Result};

/// Window width for the moving-average method, clipped to the training
/// length when the series is shorter.
pub const MOVING_AVERAGE_WINDOW: usize = 7;

/// Weight given to each new observation by the exponentially weighted
/// mean.
pub const EWM_ALPHA: f64 = 0.2;

/// A forecasting heuristic from the fixed registry.
///
/// Every method projects a single level and repeats it across the
/// horizon; none of them extrapolates a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Repeat the last observed value.
    Naive,
    /// Repeat the mean of the last [`MOVING_AVERAGE_WINDOW`] values.
    MovingAverage,
    /// Repeat the final exponentially weighted mean of the series.
    Ewm,
}

impl Method {
    /// The registry, in tie-breaking order.
    pub const ALL: [Method; 3] = [Method::Naive, Method::MovingAverage, Method::Ewm];

    /// Registry name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Naive => "naive",
            Method::MovingAverage => "moving_average",
            Method::Ewm => "ewm",
        }
    }

    /// Project `horizon` values from the training slice.
    ///
    /// Methods only ever read `train`, so scoring code can hand over the
    /// training prefix and trust that held-out data stays unseen. Fails
    /// only when `train` is empty.
    pub fn forecast(&self, train: &[f64], horizon: usize) -> Result<Vec<f64>> {
        let last = match train.last() {
            Some(value) => *value,
            None => return Err(ForecastError::EmptyData),
        };

        let level = match self {
            Method::Naive => last,
            Method::MovingAverage => {
                let window = MOVING_AVERAGE_WINDOW.min(train.len());
                let tail = &train[train.len() - window..];
                tail.iter().sum::<f64>() / window as f64
            }
            Method::Ewm => {
                // w_0 = x_0; w_i = alpha * x_i + (1 - alpha) * w_{i-1}
                let mut level = train[0];
                for value in &train[1..] {
                    level = EWM_ALPHA * value + (1.0 - EWM_ALPHA) * level;
                }
                level
            }
        };

        Ok(vec![level; horizon])
    }
}

impl FromStr for Method {
    type Err = ForecastError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "naive" => Ok(Method::Naive),
            "moving_average" => Ok(Method::MovingAverage),
            "ewm" => Ok(Method::Ewm),
            _ => Err(ForecastError::UnknownMethod(name.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
